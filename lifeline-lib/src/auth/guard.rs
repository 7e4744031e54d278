//! Registration and login.

use super::credentials::CredentialVerifier;
use super::session::Session;
use crate::model::{Account, Role};
use crate::storage::{AccountRepository, Repository};
use crate::{LifelineError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authenticates callers into a [`Session`] and registers new accounts.
pub struct AuthGuard {
    accounts: Arc<dyn Repository<Account>>,
    verifier: Arc<dyn CredentialVerifier>,
    // Serializes the handle-uniqueness check with the insert.
    registration: Mutex<()>,
}

impl AuthGuard {
    pub fn new(
        accounts: Arc<dyn Repository<Account>>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            accounts,
            verifier,
            registration: Mutex::new(()),
        }
    }

    /// Register a new account.
    ///
    /// `role` is parsed from user input; anything outside the four roles is
    /// a validation error, as is a handle that is already taken.
    #[tracing::instrument(skip(self, plaintext, email))]
    pub async fn register(
        &self,
        handle: &str,
        plaintext: &str,
        email: &str,
        role: &str,
    ) -> Result<Account> {
        let role: Role = role.parse()?;
        let handle = Account::normalize_handle(handle)?;
        let email = Account::normalize_email(email)?;
        if plaintext.chars().count() < MIN_PASSWORD_LEN {
            return Err(LifelineError::validation(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }

        let _guard = self.registration.lock().await;
        if self.accounts.find_by_handle(&handle).await?.is_some() {
            return Err(LifelineError::validation(
                "handle",
                format!("'{}' is already taken", handle),
            ));
        }

        let digest = self.verifier.hash(plaintext)?;
        let account = self
            .accounts
            .create(Account::new(handle, email, digest, role))
            .await?;
        tracing::info!(account = %account.id, %role, "account registered");
        Ok(account)
    }

    /// Authenticate `handle` into `session`.
    ///
    /// Returns `Ok(false)` for an unknown handle or a wrong credential, in
    /// which case `session` keeps whatever it held before. Storage failures
    /// are errors.
    #[tracing::instrument(skip(self, session, plaintext))]
    pub async fn login(&self, session: &mut Session, handle: &str, plaintext: &str) -> Result<bool> {
        let Some(account) = self.accounts.find_by_handle(handle).await? else {
            tracing::debug!("unknown handle");
            return Ok(false);
        };

        if !self.verifier.verify(plaintext, &account.credential_hash) {
            tracing::debug!("credential mismatch");
            return Ok(false);
        }

        tracing::info!(account = %account.id, role = %account.role(), "login succeeded");
        session.install(account);
        Ok(true)
    }

    /// Clear `session`. Idempotent.
    pub fn logout(&self, session: &mut Session) {
        session.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Argon2Verifier;
    use crate::config::CredentialConfig;
    use crate::storage::testing::FlakyRepository;
    use crate::storage::MemoryRepository;

    fn guard() -> AuthGuard {
        AuthGuard::new(
            Arc::new(MemoryRepository::<Account>::new()),
            Arc::new(Argon2Verifier::new(&CredentialConfig::fast()).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let guard = guard();
        let account = guard
            .register("asha", "s3cret!", "asha@example.org", "donor")
            .await
            .unwrap();
        assert_eq!(account.role(), Role::Donor);
        assert_ne!(account.credential_hash, "s3cret!");

        let mut session = Session::new();
        assert!(guard.login(&mut session, "asha", "s3cret!").await.unwrap());
        assert!(session.is_authenticated());
        assert_eq!(session.current_role(), Some(Role::Donor));

        guard.logout(&mut session);
        assert!(!session.is_authenticated());
        assert_eq!(session.current_role(), None);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_role_and_duplicates() {
        let guard = guard();
        let err = guard
            .register("asha", "s3cret!", "asha@example.org", "surgeon")
            .await
            .unwrap_err();
        assert!(matches!(err, LifelineError::Validation { ref field, .. } if field == "role"));

        guard
            .register("asha", "s3cret!", "asha@example.org", "donor")
            .await
            .unwrap();
        let err = guard
            .register("ASHA", "other-pass", "other@example.org", "receiver")
            .await
            .unwrap_err();
        assert!(matches!(err, LifelineError::Validation { ref field, .. } if field == "handle"));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let err = guard()
            .register("asha", "12345", "asha@example.org", "donor")
            .await
            .unwrap_err();
        assert!(matches!(err, LifelineError::Validation { ref field, .. } if field == "password"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_prior_session() {
        let guard = guard();
        guard
            .register("asha", "s3cret!", "asha@example.org", "donor")
            .await
            .unwrap();
        guard
            .register("ravi", "r3ceive", "ravi@example.org", "receiver")
            .await
            .unwrap();

        let mut session = Session::new();
        assert!(guard.login(&mut session, "asha", "s3cret!").await.unwrap());

        assert!(!guard.login(&mut session, "ravi", "wrong").await.unwrap());
        assert!(!guard.login(&mut session, "nobody", "s3cret!").await.unwrap());
        assert_eq!(session.account().unwrap().handle, "asha");

        // A new successful login replaces the previous one.
        assert!(guard.login(&mut session, "ravi", "r3ceive").await.unwrap());
        assert_eq!(session.current_role(), Some(Role::Receiver));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let accounts = Arc::new(FlakyRepository::<Account>::new());
        accounts.set_failing(true);
        let guard = AuthGuard::new(
            accounts.clone(),
            Arc::new(Argon2Verifier::new(&CredentialConfig::fast()).unwrap()),
        );

        let err = guard
            .register("asha", "s3cret!", "asha@example.org", "donor")
            .await
            .unwrap_err();
        assert!(matches!(err, LifelineError::Storage(_)));
        assert!(accounts.inner.is_empty());
    }
}
