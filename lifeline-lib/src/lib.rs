//! Lifeline library.
//!
//! Decision core for coordinating blood/organ donors, recipients, hospitals
//! and charities. Persistence and credential storage are consumed through
//! traits; the crate performs no I/O of its own beyond what a
//! [`Repository`](storage::Repository) implementation does.
//!
//! # Features
//!
//! - **Credential Verifier**: salted Argon2 hashing behind [`auth::CredentialVerifier`]
//! - **Session Guard**: an explicit per-caller [`auth::Session`] with a closed
//!   role/operation authorization table
//! - **Approval State Machine**: administrator-driven Pending → Approved/Rejected
//! - **Matching Engine**: donor and hospital search behind the approval gate
//! - **Payment Gateways**: interchangeable card and UPI backends behind
//!   [`payments::PaymentGateway`]
//!
//! # Example
//!
//! ```ignore
//! use lifeline_lib::prelude::*;
//!
//! let accounts = Arc::new(MemoryRepository::<Account>::new());
//! let guard = AuthGuard::new(accounts, Arc::new(Argon2Verifier::default()));
//!
//! guard.register("alice", "hunter22", "alice@example.org", "donor").await?;
//!
//! let mut session = Session::new();
//! assert!(guard.login(&mut session, "alice", "hunter22").await?);
//! assert_eq!(session.current_role(), Some(Role::Donor));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub mod amount;
pub mod approval;
pub mod auth;
pub mod charity;
pub mod config;
pub mod errors;
pub mod hospitals;
pub mod locks;
pub mod matching;
pub mod model;
pub mod payments;
pub mod prelude;
pub mod profiles;
pub mod storage;

pub use amount::Amount;
pub use config::LifelineConfig;
pub use errors::{LifelineError, LifelineErrorCode};

/// Common result alias for Lifeline operations.
pub type Result<T> = std::result::Result<T, LifelineError>;

/// Identifier of an [`Account`](model::Account).
///
/// # Example
///
/// ```
/// use lifeline_lib::AccountId;
///
/// let id = AccountId::generate();
/// let parsed: AccountId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

/// Identifier of a stored entity (profile, request, hospital, charity, campaign).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

macro_rules! uuid_id {
    ($name:ident) => {
        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = LifelineError;

            fn from_str(s: &str) -> Result<Self> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| LifelineError::validation(stringify!($name), e.to_string()))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(AccountId);
uuid_id!(EntityId);

impl From<AccountId> for EntityId {
    fn from(id: AccountId) -> Self {
        Self(id.0)
    }
}
