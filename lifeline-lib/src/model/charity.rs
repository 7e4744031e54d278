use super::required;
use crate::storage::Entity;
use crate::{AccountId, Amount, EntityId, LifelineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owner-supplied charity fields.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CharityDraft {
    pub name: String,
    pub description: String,
    pub contact: String,
}

/// A charity organisation run by a Charity account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharityProfile {
    pub id: EntityId,
    pub owner: AccountId,
    pub name: String,
    pub description: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

impl CharityProfile {
    pub fn new(owner: AccountId, draft: CharityDraft) -> Result<Self> {
        Ok(Self {
            id: EntityId::generate(),
            owner,
            name: required("name", &draft.name)?,
            description: draft.description.trim().to_string(),
            contact: required("contact", &draft.contact)?,
            created_at: Utc::now(),
        })
    }
}

impl Entity for CharityProfile {
    type Id = EntityId;
    const KIND: &'static str = "charity";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<AccountId> {
        Some(self.owner)
    }
}

/// Fields for a new campaign.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub title: String,
    pub goal: Amount,
}

/// A fundraising campaign.
///
/// Only `goal` and `raised` are stored; whether the goal is reached is
/// always derived from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharityCampaign {
    pub id: EntityId,
    pub charity_id: EntityId,
    /// Owner of the parent charity, copied for owner lookups.
    pub owner: AccountId,
    pub title: String,
    pub goal: Amount,
    pub raised: Amount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CharityCampaign {
    pub fn new(charity: &CharityProfile, draft: CampaignDraft) -> Result<Self> {
        if !draft.goal.is_positive() {
            return Err(LifelineError::validation("goal", "must be greater than zero"));
        }
        let now = Utc::now();
        Ok(Self {
            id: EntityId::generate(),
            charity_id: charity.id,
            owner: charity.owner,
            title: required("title", &draft.title)?,
            goal: draft.goal,
            raised: Amount::zero(),
            created_at: now,
            updated_at: now,
        })
    }

    /// `raised >= goal`.
    pub fn goal_reached(&self) -> bool {
        self.raised >= self.goal
    }

    /// Add a confirmed contribution.
    pub fn record_contribution(&mut self, amount: Amount) -> Result<()> {
        if !amount.is_positive() {
            return Err(LifelineError::validation("amount", "must be greater than zero"));
        }
        self.raised = self
            .raised
            .checked_add(&amount)
            .ok_or_else(|| LifelineError::validation("amount", "total raised would overflow"))?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl Entity for CharityCampaign {
    type Id = EntityId;
    const KIND: &'static str = "campaign";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<AccountId> {
        Some(self.owner)
    }
}
