//! Charities, campaigns and contributions.
//!
//! A contribution authorizes through whichever [`PaymentGateway`] the caller
//! hands in. Only an approved payment changes the campaign, and the change
//! is made under the campaign's entity lock so concurrent contributions all
//! land. Once a payment is approved, recording it runs as its own task:
//! dropping the caller's future after that point still records the funds.

use crate::auth::{Operation, Session};
use crate::locks::EntityLocks;
use crate::model::{CampaignDraft, CharityCampaign, CharityDraft, CharityProfile};
use crate::payments::{CredentialPayload, PaymentGateway, PaymentTransaction};
use crate::storage::Repository;
use crate::{Amount, EntityId, LifelineError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;

/// Outcome of [`CharityService::contribute`].
#[derive(Clone, Debug, Serialize)]
pub struct ContributionReceipt {
    pub transaction: PaymentTransaction,
    /// Campaign as stored after the contribution (unchanged if declined).
    pub campaign: CharityCampaign,
}

impl ContributionReceipt {
    pub fn is_approved(&self) -> bool {
        self.transaction.is_approved()
    }
}

pub struct CharityService {
    charities: Arc<dyn Repository<CharityProfile>>,
    campaigns: Arc<dyn Repository<CharityCampaign>>,
    locks: Arc<EntityLocks>,
}

impl CharityService {
    pub fn new(
        charities: Arc<dyn Repository<CharityProfile>>,
        campaigns: Arc<dyn Repository<CharityCampaign>>,
        locks: Arc<EntityLocks>,
    ) -> Self {
        Self {
            charities,
            campaigns,
            locks,
        }
    }

    /// Register the caller's charity. One per Charity account.
    #[tracing::instrument(skip_all)]
    pub async fn create_charity(&self, session: &Session, draft: CharityDraft) -> Result<CharityProfile> {
        let owner = session.authorize(Operation::ManageCharity)?.id;
        let _guard = self.locks.lock(owner.into()).await;
        if !self.charities.find_by_owner(&owner).await?.is_empty() {
            return Err(LifelineError::validation("owner", "account already has a charity"));
        }

        let charity = self.charities.create(CharityProfile::new(owner, draft)?).await?;
        tracing::info!(charity = %charity.id, name = %charity.name, "charity registered");
        Ok(charity)
    }

    pub async fn my_charity(&self, session: &Session) -> Result<Option<CharityProfile>> {
        let owner = session.authorize(Operation::ManageCharity)?.id;
        Ok(self.charities.find_by_owner(&owner).await?.into_iter().next())
    }

    /// Open a campaign under the caller's charity.
    #[tracing::instrument(skip_all)]
    pub async fn create_campaign(&self, session: &Session, draft: CampaignDraft) -> Result<CharityCampaign> {
        let owner = session.authorize(Operation::ManageCharity)?.id;
        let charity = self
            .charities
            .find_by_owner(&owner)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LifelineError::not_found("charity", owner))?;

        let campaign = self
            .campaigns
            .create(CharityCampaign::new(&charity, draft)?)
            .await?;
        tracing::info!(campaign = %campaign.id, goal = %campaign.goal, "campaign opened");
        Ok(campaign)
    }

    /// All campaigns, visible to any signed-in account.
    pub async fn list_campaigns(&self, session: &Session) -> Result<Vec<CharityCampaign>> {
        session.require_authenticated()?;
        self.campaigns.find_all().await
    }

    pub async fn campaign(&self, session: &Session, id: EntityId) -> Result<CharityCampaign> {
        session.require_authenticated()?;
        self.campaigns.get(&id).await
    }

    /// Pay `amount` towards a campaign through `gateway`.
    ///
    /// A declined payment is `Ok` with an unchanged campaign. A missing
    /// campaign fails before the gateway is contacted. Dropping the future
    /// while the gateway is still deciding leaves the campaign untouched.
    /// If recording an approved payment fails, the error is
    /// [`LifelineError::UnrecordedPayment`] carrying the transaction id.
    #[tracing::instrument(skip(self, session, gateway, payload), fields(gateway = gateway.gateway_name()))]
    pub async fn contribute(
        &self,
        session: &Session,
        campaign_id: EntityId,
        gateway: &dyn PaymentGateway,
        payload: &CredentialPayload,
        amount: Amount,
    ) -> Result<ContributionReceipt> {
        let payer = session.authorize(Operation::AuthorizePayment)?;
        let campaign = self.campaigns.get(&campaign_id).await?;

        let transaction = gateway.authorize(&payer.handle, &amount, payload).await?;
        if !transaction.is_approved() {
            return Ok(ContributionReceipt {
                transaction,
                campaign,
            });
        }

        let commit = tokio::spawn(
            record_contribution(
                Arc::clone(&self.campaigns),
                Arc::clone(&self.locks),
                campaign_id,
                amount,
            )
            .in_current_span(),
        );
        let recorded = match commit.await {
            Ok(recorded) => recorded,
            Err(e) => Err(LifelineError::storage(e)),
        };

        match recorded {
            Ok(campaign) => Ok(ContributionReceipt {
                transaction,
                campaign,
            }),
            Err(reason) => {
                let transaction_id = transaction.transaction_id.unwrap_or_default();
                tracing::error!(
                    transaction = %transaction_id,
                    %amount,
                    error = %reason,
                    "approved payment not recorded"
                );
                Err(LifelineError::UnrecordedPayment {
                    transaction_id,
                    amount,
                    reason: Box::new(reason),
                })
            }
        }
    }

    /// Remove a campaign. Waits for in-flight contributions to it.
    #[tracing::instrument(skip(self, session))]
    pub async fn delete_campaign(&self, session: &Session, id: EntityId) -> Result<()> {
        session.authorize(Operation::DeleteEntity)?;
        self.remove_campaign(id).await
    }

    /// Remove a charity together with its campaigns.
    #[tracing::instrument(skip(self, session))]
    pub async fn delete_charity(&self, session: &Session, id: EntityId) -> Result<()> {
        session.authorize(Operation::DeleteEntity)?;
        let _guard = self.locks.lock(id).await;
        self.charities.get(&id).await?;

        let campaigns: Vec<_> = self
            .campaigns
            .find_all()
            .await?
            .into_iter()
            .filter(|c| c.charity_id == id)
            .map(|c| c.id)
            .collect();
        for campaign in campaigns {
            self.remove_campaign(campaign).await?;
        }

        self.charities.delete(&id).await?;
        tracing::info!(charity = %id, "charity removed");
        Ok(())
    }

    async fn remove_campaign(&self, id: EntityId) -> Result<()> {
        let _guard = self.locks.lock(id).await;
        self.campaigns.delete(&id).await?;
        tracing::info!(campaign = %id, "campaign removed");
        Ok(())
    }
}

/// Add an approved amount to the stored campaign under its entity lock.
async fn record_contribution(
    campaigns: Arc<dyn Repository<CharityCampaign>>,
    locks: Arc<EntityLocks>,
    campaign_id: EntityId,
    amount: Amount,
) -> Result<CharityCampaign> {
    let _guard = locks.lock(campaign_id).await;
    let mut campaign = campaigns.get(&campaign_id).await?;
    campaign.record_contribution(amount)?;
    let campaign = campaigns.update(campaign).await?;
    tracing::info!(
        campaign = %campaign.id,
        %amount,
        raised = %campaign.raised,
        goal_reached = campaign.goal_reached(),
        "contribution recorded"
    );
    Ok(campaign)
}
