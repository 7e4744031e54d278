//! Per-caller session context.
//!
//! A [`Session`] is owned by whoever represents one logical caller (a
//! window, a connection, a request) and is passed to every privileged
//! operation. There is no process-wide "current user".

use super::policy::Operation;
use crate::model::{Account, Role};
use crate::{AccountId, LifelineError, Result};

/// Which account, if any, is authenticated for this caller.
#[derive(Clone, Debug, Default)]
pub struct Session {
    account: Option<Account>,
}

impl Session {
    /// An unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `account`, replacing any previous one.
    pub(crate) fn install(&mut self, account: Account) {
        self.account = Some(account);
    }

    /// Clear the session. Idempotent.
    pub fn logout(&mut self) {
        if let Some(account) = self.account.take() {
            tracing::info!(handle = %account.handle, "session closed");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }

    pub fn current_role(&self) -> Option<Role> {
        self.account.as_ref().map(Account::role)
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.account.as_ref().map(|a| a.id)
    }

    /// The authenticated account, or `Unauthenticated`.
    pub fn require_authenticated(&self) -> Result<&Account> {
        self.account.as_ref().ok_or(LifelineError::Unauthenticated)
    }

    /// The authenticated account if it holds exactly `role`.
    pub fn require_role(&self, role: Role) -> Result<&Account> {
        let account = self.require_authenticated()?;
        if account.role() != role {
            tracing::warn!(handle = %account.handle, required = %role, "role check refused");
            return Err(LifelineError::unauthorized(
                format!("act as {}", role),
                format!("caller is {}", account.role()),
            ));
        }
        Ok(account)
    }

    /// The authenticated account if its role permits `operation`.
    pub fn authorize(&self, operation: Operation) -> Result<&Account> {
        let account = self.require_authenticated()?;
        if !operation.permits(account.role()) {
            tracing::warn!(
                handle = %account.handle,
                role = %account.role(),
                %operation,
                "authorization refused"
            );
            return Err(LifelineError::unauthorized(
                operation.to_string(),
                format!("role {} is not permitted", account.role()),
            ));
        }
        Ok(account)
    }
}
