use super::{optional, required, BloodGroup};
use crate::approval::{ApprovalState, Reviewable};
use crate::storage::Entity;
use crate::{AccountId, EntityId, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owner-supplied receiver fields, unvalidated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReceiverDraft {
    pub patient_name: String,
    pub blood_group_needed: String,
    /// `None` (or blank) when only blood is needed.
    pub organ_needed: Option<String>,
    pub location: String,
    pub contact: String,
}

/// A recipient's request for blood or an organ.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiverRequest {
    pub id: EntityId,
    /// Owning Receiver account.
    pub owner: AccountId,
    pub patient_name: String,
    pub blood_group_needed: BloodGroup,
    pub organ_needed: Option<String>,
    pub location: String,
    pub contact: String,
    pub approval: ApprovalState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReceiverRequest {
    /// Validate a draft into a new pending request.
    pub fn new(owner: AccountId, draft: ReceiverDraft) -> Result<Self> {
        let now = Utc::now();
        let mut request = Self {
            id: EntityId::generate(),
            owner,
            patient_name: String::new(),
            blood_group_needed: BloodGroup::OPositive,
            organ_needed: None,
            location: String::new(),
            contact: String::new(),
            approval: ApprovalState::Pending,
            created_at: now,
            updated_at: now,
        };
        request.apply(draft)?;
        Ok(request)
    }

    /// Replace the owner-editable fields. Approval state is untouched.
    pub fn apply(&mut self, draft: ReceiverDraft) -> Result<()> {
        let patient_name = required("patient_name", &draft.patient_name)?;
        let blood_group_needed = draft.blood_group_needed.parse()?;
        let location = required("location", &draft.location)?;
        let contact = required("contact", &draft.contact)?;

        self.patient_name = patient_name;
        self.blood_group_needed = blood_group_needed;
        self.organ_needed = optional(draft.organ_needed.as_deref());
        self.location = location;
        self.contact = contact;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_approved(&self) -> bool {
        self.approval.is_visible()
    }
}

impl Entity for ReceiverRequest {
    type Id = EntityId;
    const KIND: &'static str = "receiver request";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<AccountId> {
        Some(self.owner)
    }
}

impl Reviewable for ReceiverRequest {
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
