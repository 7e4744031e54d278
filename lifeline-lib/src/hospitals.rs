//! Administrator-managed hospital directory.

use crate::auth::{Operation, Session};
use crate::model::{Hospital, HospitalDraft};
use crate::storage::Repository;
use crate::{EntityId, Result};
use std::sync::Arc;

/// Create, edit and remove hospitals. Reads go through
/// [`MatchingEngine::find_hospitals`](crate::matching::MatchingEngine::find_hospitals).
pub struct HospitalRegistry {
    hospitals: Arc<dyn Repository<Hospital>>,
}

impl HospitalRegistry {
    pub fn new(hospitals: Arc<dyn Repository<Hospital>>) -> Self {
        Self { hospitals }
    }

    #[tracing::instrument(skip_all)]
    pub async fn create(&self, session: &Session, draft: HospitalDraft) -> Result<Hospital> {
        session.authorize(Operation::ManageHospitals)?;
        let hospital = self.hospitals.create(Hospital::new(draft)?).await?;
        tracing::info!(hospital = %hospital.id, name = %hospital.name, "hospital added");
        Ok(hospital)
    }

    #[tracing::instrument(skip(self, session, draft))]
    pub async fn update(&self, session: &Session, id: EntityId, draft: HospitalDraft) -> Result<Hospital> {
        session.authorize(Operation::ManageHospitals)?;
        let mut hospital = self.hospitals.get(&id).await?;
        hospital.apply(draft)?;
        self.hospitals.update(hospital).await
    }

    #[tracing::instrument(skip(self, session))]
    pub async fn delete(&self, session: &Session, id: EntityId) -> Result<()> {
        session.authorize(Operation::DeleteEntity)?;
        self.hospitals.delete(&id).await?;
        tracing::info!("hospital removed");
        Ok(())
    }

    /// Every hospital, for administration screens.
    pub async fn list(&self, session: &Session) -> Result<Vec<Hospital>> {
        session.authorize(Operation::ManageHospitals)?;
        self.hospitals.find_all().await
    }
}
