//! Common test utilities for lifeline-lib integration tests

use lifeline_lib::prelude::*;
use std::path::Path;

pub const PASSWORD: &str = "correct-horse";

/// Install a test-writer subscriber once; honours `RUST_LOG`.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Every service wired against one set of repositories.
#[allow(dead_code)]
pub struct TestContext {
    pub guard: AuthGuard,
    pub profiles: ProfileService,
    pub hospitals: HospitalRegistry,
    pub matching: MatchingEngine,
    pub charity: CharityService,
}

#[allow(dead_code)]
impl TestContext {
    /// In-memory repositories, default matching.
    pub fn in_memory() -> Self {
        Self::in_memory_with(MatchingConfig::default())
    }

    pub fn in_memory_with(matching: MatchingConfig) -> Self {
        Self::build(
            Arc::new(MemoryRepository::<Account>::new()),
            Arc::new(MemoryRepository::<DonorProfile>::new()),
            Arc::new(MemoryRepository::<ReceiverRequest>::new()),
            Arc::new(MemoryRepository::<Hospital>::new()),
            Arc::new(MemoryRepository::<CharityProfile>::new()),
            Arc::new(MemoryRepository::<CharityCampaign>::new()),
            matching,
        )
    }

    /// JSON documents under `dir`. Two contexts on the same directory see
    /// the same data.
    pub fn on_disk(dir: &Path) -> Self {
        Self::build(
            Arc::new(JsonFileRepository::<Account>::new(dir)),
            Arc::new(JsonFileRepository::<DonorProfile>::new(dir)),
            Arc::new(JsonFileRepository::<ReceiverRequest>::new(dir)),
            Arc::new(JsonFileRepository::<Hospital>::new(dir)),
            Arc::new(JsonFileRepository::<CharityProfile>::new(dir)),
            Arc::new(JsonFileRepository::<CharityCampaign>::new(dir)),
            MatchingConfig::default(),
        )
    }

    fn build(
        accounts: Arc<dyn Repository<Account>>,
        donors: Arc<dyn Repository<DonorProfile>>,
        receivers: Arc<dyn Repository<ReceiverRequest>>,
        hospitals: Arc<dyn Repository<Hospital>>,
        charities: Arc<dyn Repository<CharityProfile>>,
        campaigns: Arc<dyn Repository<CharityCampaign>>,
        matching: MatchingConfig,
    ) -> Self {
        let locks = Arc::new(EntityLocks::new());
        let verifier = Arc::new(Argon2Verifier::new(&CredentialConfig::fast()).unwrap());
        Self {
            guard: AuthGuard::new(accounts, verifier),
            profiles: ProfileService::new(donors.clone(), receivers.clone(), locks.clone()),
            hospitals: HospitalRegistry::new(hospitals.clone()),
            matching: MatchingEngine::new(donors, receivers, hospitals, matching),
            charity: CharityService::new(charities, campaigns, locks),
        }
    }

    /// Register `handle` with `role` and return a logged-in session.
    pub async fn signed_in(&self, handle: &str, role: &str) -> Session {
        self.guard
            .register(handle, PASSWORD, &format!("{}@example.org", handle), role)
            .await
            .unwrap();
        self.login(handle).await
    }

    pub async fn login(&self, handle: &str) -> Session {
        let mut session = Session::new();
        assert!(self.guard.login(&mut session, handle, PASSWORD).await.unwrap());
        session
    }
}

#[allow(dead_code)]
pub fn donor_draft(name: &str, group: &str, organ: Option<&str>, location: &str) -> DonorDraft {
    DonorDraft {
        name: name.to_string(),
        blood_group: group.to_string(),
        organ: organ.map(str::to_string),
        location: location.to_string(),
        contact: format!("{}@example.org", name.to_lowercase()),
    }
}

#[allow(dead_code)]
pub fn receiver_draft(name: &str, group: &str, organ: Option<&str>, location: &str) -> ReceiverDraft {
    ReceiverDraft {
        patient_name: name.to_string(),
        blood_group_needed: group.to_string(),
        organ_needed: organ.map(str::to_string),
        location: location.to_string(),
        contact: "ward-7".to_string(),
    }
}
