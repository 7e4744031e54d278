//! Common imports.
//!
//! ```
//! use lifeline_lib::prelude::*;
//! ```

pub use crate::approval::{ApprovalState, ApprovalWorkflow, Reviewable};
pub use crate::auth::{Argon2Verifier, AuthGuard, CredentialVerifier, Operation, Session};
pub use crate::charity::{CharityService, ContributionReceipt};
pub use crate::config::{CredentialConfig, LocationMatch, MatchingConfig, PaymentConfig};
pub use crate::hospitals::HospitalRegistry;
pub use crate::locks::EntityLocks;
pub use crate::matching::{DonorQuery, MatchingEngine};
pub use crate::model::{
    Account, BloodGroup, CampaignDraft, CharityCampaign, CharityDraft, CharityProfile, DonorDraft,
    DonorProfile, Hospital, HospitalDraft, ReceiverDraft, ReceiverRequest, Role,
};
pub use crate::payments::{
    CardGateway, CredentialPayload, GatewayRegistry, PaymentGateway, PaymentStatus,
    PaymentTransaction, UpiGateway, ValidationResult,
};
pub use crate::profiles::ProfileService;
pub use crate::storage::{AccountRepository, Entity, JsonFileRepository, MemoryRepository, Repository};
pub use crate::{AccountId, Amount, EntityId, LifelineConfig, LifelineError, Result};
pub use std::sync::Arc;
