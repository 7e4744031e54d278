use super::required;
use crate::storage::Entity;
use crate::{AccountId, EntityId, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Split a delimited capability list (`,` or `;`) into a set of organ names.
///
/// Items are trimmed; empty items are dropped.
///
/// ```
/// use lifeline_lib::model::parse_capabilities;
///
/// let organs = parse_capabilities("kidney, liver;; heart ");
/// assert_eq!(organs.len(), 3);
/// assert!(organs.contains("heart"));
/// ```
pub fn parse_capabilities(list: &str) -> BTreeSet<String> {
    list.split([',', ';'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Administrator-supplied hospital fields.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HospitalDraft {
    pub name: String,
    pub address: String,
    pub contact: String,
    /// Delimited list of organs the hospital can process.
    pub capabilities: String,
}

/// A hospital and the organs it can process. Not subject to approval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: EntityId,
    pub name: String,
    pub address: String,
    pub contact: String,
    pub capabilities: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hospital {
    pub fn new(draft: HospitalDraft) -> Result<Self> {
        let now = Utc::now();
        let mut hospital = Self {
            id: EntityId::generate(),
            name: String::new(),
            address: String::new(),
            contact: String::new(),
            capabilities: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        };
        hospital.apply(draft)?;
        Ok(hospital)
    }

    pub fn apply(&mut self, draft: HospitalDraft) -> Result<()> {
        let name = required("name", &draft.name)?;
        let address = required("address", &draft.address)?;

        self.name = name;
        self.address = address;
        self.contact = draft.contact.trim().to_string();
        self.capabilities = parse_capabilities(&draft.capabilities);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether the hospital lists `organ` among its capabilities.
    pub fn can_process(&self, organ: &str) -> bool {
        self.capabilities.contains(organ.trim())
    }
}

impl Entity for Hospital {
    type Id = EntityId;
    const KIND: &'static str = "hospital";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<AccountId> {
        None
    }
}
