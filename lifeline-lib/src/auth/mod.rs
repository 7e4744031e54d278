//! Authentication and authorization.
//!
//! - [`CredentialVerifier`] hashes and checks passwords
//! - [`Session`] is the explicit per-caller context
//! - [`Operation`] is the closed role/operation table
//! - [`AuthGuard`] registers accounts and logs callers in

mod credentials;
mod guard;
mod policy;
mod session;

pub use credentials::{Argon2Verifier, CredentialVerifier};
pub use guard::{AuthGuard, MIN_PASSWORD_LEN};
pub use policy::Operation;
pub use session::Session;
