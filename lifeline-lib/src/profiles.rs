//! Owner-side management of donor profiles and receiver requests.
//!
//! A Donor account owns at most one [`DonorProfile`] and a Receiver account
//! at most one [`ReceiverRequest`]. Owners edit fields and availability;
//! approval state is only ever changed through the [`ApprovalWorkflow`].

use crate::approval::ApprovalWorkflow;
use crate::auth::{Operation, Session};
use crate::locks::EntityLocks;
use crate::model::{DonorDraft, DonorProfile, ReceiverDraft, ReceiverRequest};
use crate::storage::{Entity, Repository};
use crate::{AccountId, LifelineError, Result};
use std::sync::Arc;

/// Profile and request service, plus the moderation workflows over them.
pub struct ProfileService {
    donors: Arc<dyn Repository<DonorProfile>>,
    receivers: Arc<dyn Repository<ReceiverRequest>>,
    locks: Arc<EntityLocks>,
    donor_review: ApprovalWorkflow<DonorProfile>,
    receiver_review: ApprovalWorkflow<ReceiverRequest>,
}

impl ProfileService {
    pub fn new(
        donors: Arc<dyn Repository<DonorProfile>>,
        receivers: Arc<dyn Repository<ReceiverRequest>>,
        locks: Arc<EntityLocks>,
    ) -> Self {
        Self {
            donor_review: ApprovalWorkflow::new(Arc::clone(&donors), Arc::clone(&locks)),
            receiver_review: ApprovalWorkflow::new(Arc::clone(&receivers), Arc::clone(&locks)),
            donors,
            receivers,
            locks,
        }
    }

    /// Moderation of donor profiles.
    pub fn donor_review(&self) -> &ApprovalWorkflow<DonorProfile> {
        &self.donor_review
    }

    /// Moderation of receiver requests.
    pub fn receiver_review(&self) -> &ApprovalWorkflow<ReceiverRequest> {
        &self.receiver_review
    }

    // ---- donor side ----

    /// Create the caller's donor profile. It starts Pending and available.
    #[tracing::instrument(skip_all)]
    pub async fn create_donor_profile(&self, session: &Session, draft: DonorDraft) -> Result<DonorProfile> {
        let owner = session.authorize(Operation::ManageOwnDonorProfile)?.id;
        // Keyed on the account so two creates for one owner cannot both pass.
        let _guard = self.locks.lock(owner.into()).await;
        ensure_none(&*self.donors, &owner).await?;

        let profile = self.donors.create(DonorProfile::new(owner, draft)?).await?;
        tracing::info!(profile = %profile.id, "donor profile created");
        Ok(profile)
    }

    /// Replace the caller's profile fields, keeping approval state.
    #[tracing::instrument(skip_all)]
    pub async fn update_donor_profile(&self, session: &Session, draft: DonorDraft) -> Result<DonorProfile> {
        let owner = session.authorize(Operation::ManageOwnDonorProfile)?.id;
        let id = own(&*self.donors, &owner).await?.id;

        let _guard = self.locks.lock(id).await;
        let mut profile = self.donors.get(&id).await?;
        profile.apply(draft)?;
        self.donors.update(profile).await
    }

    /// Toggle whether the caller is currently able to donate.
    #[tracing::instrument(skip(self, session))]
    pub async fn set_donor_availability(&self, session: &Session, available: bool) -> Result<DonorProfile> {
        let owner = session.authorize(Operation::ManageOwnDonorProfile)?.id;
        let id = own(&*self.donors, &owner).await?.id;

        let _guard = self.locks.lock(id).await;
        let mut profile = self.donors.get(&id).await?;
        profile.available = available;
        profile.updated_at = chrono::Utc::now();
        self.donors.update(profile).await
    }

    /// The caller's donor profile, if created.
    pub async fn my_donor_profile(&self, session: &Session) -> Result<Option<DonorProfile>> {
        let owner = session.authorize(Operation::ManageOwnDonorProfile)?.id;
        Ok(self.donors.find_by_owner(&owner).await?.into_iter().next())
    }

    /// Send a rejected donor profile back for review.
    pub async fn resubmit_donor_profile(&self, session: &Session) -> Result<DonorProfile> {
        let owner = session.authorize(Operation::ManageOwnDonorProfile)?.id;
        let id = own(&*self.donors, &owner).await?.id;
        self.donor_review.resubmit(session, id).await
    }

    // ---- receiver side ----

    /// Create the caller's receiver request. It starts Pending.
    #[tracing::instrument(skip_all)]
    pub async fn create_receiver_request(
        &self,
        session: &Session,
        draft: ReceiverDraft,
    ) -> Result<ReceiverRequest> {
        let owner = session.authorize(Operation::ManageOwnReceiverRequest)?.id;
        let _guard = self.locks.lock(owner.into()).await;
        ensure_none(&*self.receivers, &owner).await?;

        let request = self
            .receivers
            .create(ReceiverRequest::new(owner, draft)?)
            .await?;
        tracing::info!(request = %request.id, "receiver request created");
        Ok(request)
    }

    /// Replace the caller's request fields, keeping approval state.
    #[tracing::instrument(skip_all)]
    pub async fn update_receiver_request(
        &self,
        session: &Session,
        draft: ReceiverDraft,
    ) -> Result<ReceiverRequest> {
        let owner = session.authorize(Operation::ManageOwnReceiverRequest)?.id;
        let id = own(&*self.receivers, &owner).await?.id;

        let _guard = self.locks.lock(id).await;
        let mut request = self.receivers.get(&id).await?;
        request.apply(draft)?;
        self.receivers.update(request).await
    }

    pub async fn my_receiver_request(&self, session: &Session) -> Result<Option<ReceiverRequest>> {
        let owner = session.authorize(Operation::ManageOwnReceiverRequest)?.id;
        Ok(self.receivers.find_by_owner(&owner).await?.into_iter().next())
    }

    /// Send a rejected receiver request back for review.
    pub async fn resubmit_receiver_request(&self, session: &Session) -> Result<ReceiverRequest> {
        let owner = session.authorize(Operation::ManageOwnReceiverRequest)?.id;
        let id = own(&*self.receivers, &owner).await?.id;
        self.receiver_review.resubmit(session, id).await
    }
}

async fn ensure_none<T: Entity>(repo: &dyn Repository<T>, owner: &AccountId) -> Result<()> {
    if !repo.find_by_owner(owner).await?.is_empty() {
        return Err(LifelineError::validation(
            "owner",
            format!("account already has a {}", T::KIND),
        ));
    }
    Ok(())
}

async fn own<T: Entity>(repo: &dyn Repository<T>, owner: &AccountId) -> Result<T> {
    repo.find_by_owner(owner)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| LifelineError::not_found(T::KIND, owner))
}
