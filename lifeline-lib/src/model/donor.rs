use super::{optional, required};
use crate::approval::{ApprovalState, Reviewable};
use crate::storage::Entity;
use crate::{AccountId, EntityId, LifelineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ABO group with Rh factor.
///
/// Matching compares groups for equality only; transfusion compatibility
/// (e.g. O- as universal donor) is deliberately not modeled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// Canonical label, e.g. `"AB+"` or `"O-"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = LifelineError;

    /// Accepts the canonical labels, case-insensitively, with either an
    /// ASCII hyphen or a Unicode minus sign for the negative factor.
    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_ascii_uppercase().replace('\u{2212}', "-");
        match label.as_str() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            _ => Err(LifelineError::validation(
                "blood_group",
                format!("'{}' is not one of A, B, AB, O with + or -", s.trim()),
            )),
        }
    }
}

/// Owner-supplied donor fields, unvalidated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DonorDraft {
    pub name: String,
    pub blood_group: String,
    /// `None` (or blank) for blood-only donors.
    pub organ: Option<String>,
    pub location: String,
    pub contact: String,
}

/// A donor's published profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub id: EntityId,
    /// Owning Donor account.
    pub owner: AccountId,
    pub name: String,
    pub blood_group: BloodGroup,
    pub organ: Option<String>,
    pub location: String,
    pub contact: String,
    /// Donor-controlled availability.
    pub available: bool,
    /// Administrator-controlled visibility.
    pub approval: ApprovalState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DonorProfile {
    /// Validate a draft into a new pending, available profile.
    pub fn new(owner: AccountId, draft: DonorDraft) -> Result<Self> {
        let now = Utc::now();
        let mut profile = Self {
            id: EntityId::generate(),
            owner,
            name: String::new(),
            blood_group: BloodGroup::OPositive,
            organ: None,
            location: String::new(),
            contact: String::new(),
            available: true,
            approval: ApprovalState::Pending,
            created_at: now,
            updated_at: now,
        };
        profile.apply(draft)?;
        Ok(profile)
    }

    /// Replace the owner-editable fields. Approval state is untouched.
    ///
    /// On error `self` is left unchanged.
    pub fn apply(&mut self, draft: DonorDraft) -> Result<()> {
        let name = required("name", &draft.name)?;
        let blood_group = draft.blood_group.parse()?;
        let location = required("location", &draft.location)?;
        let contact = required("contact", &draft.contact)?;

        self.name = name;
        self.blood_group = blood_group;
        self.organ = optional(draft.organ.as_deref());
        self.location = location;
        self.contact = contact;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Visible to search.
    pub fn is_approved(&self) -> bool {
        self.approval.is_visible()
    }
}

impl Entity for DonorProfile {
    type Id = EntityId;
    const KIND: &'static str = "donor profile";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<AccountId> {
        Some(self.owner)
    }
}

impl Reviewable for DonorProfile {
    fn approval(&self) -> ApprovalState {
        self.approval
    }

    fn set_approval(&mut self, state: ApprovalState) {
        self.approval = state;
        self.updated_at = Utc::now();
    }

    fn owner_id(&self) -> AccountId {
        self.owner
    }
}
