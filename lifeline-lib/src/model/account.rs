use crate::storage::Entity;
use crate::{AccountId, LifelineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of roles an account can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Moderates submissions, manages hospitals, deletes entities.
    Administrator,
    /// Publishes a donor profile and contributes to campaigns.
    Donor,
    /// Publishes a receiver request and searches for matches.
    Receiver,
    /// Runs fundraising campaigns.
    Charity,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 4] = [
        Role::Administrator,
        Role::Donor,
        Role::Receiver,
        Role::Charity,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Donor => "donor",
            Self::Receiver => "receiver",
            Self::Charity => "charity",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LifelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "donor" => Ok(Self::Donor),
            "receiver" => Ok(Self::Receiver),
            "charity" => Ok(Self::Charity),
            other => Err(LifelineError::validation(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// An authenticated identity.
///
/// The role is fixed at registration. Accounts are never "approved";
/// approval applies to the role-specific records that point at them.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Unique login handle.
    pub handle: String,
    /// Contact email.
    pub email: String,
    /// PHC-format credential digest.
    pub credential_hash: String,
    role: Role,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create an account from already validated parts.
    pub fn new(
        handle: impl Into<String>,
        email: impl Into<String>,
        credential_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: AccountId::generate(),
            handle: handle.into(),
            email: email.into(),
            credential_hash: credential_hash.into(),
            role,
            created_at: Utc::now(),
        }
    }

    /// The account's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Validate and normalize a login handle.
    ///
    /// Handles are 3 to 32 characters of ASCII letters, digits, `_`, `-` or `.`.
    pub fn normalize_handle(handle: &str) -> Result<String> {
        let handle = handle.trim();
        if handle.len() < 3 || handle.len() > 32 {
            return Err(LifelineError::validation(
                "handle",
                "must be between 3 and 32 characters",
            ));
        }
        if !handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(LifelineError::validation(
                "handle",
                "may only contain letters, digits, '_', '-' and '.'",
            ));
        }
        Ok(handle.to_string())
    }

    /// Validate and normalize an email address.
    pub fn normalize_email(email: &str) -> Result<String> {
        let email = email.trim();
        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(email.to_string())
            }
            _ => Err(LifelineError::validation(
                "email",
                "must look like name@domain",
            )),
        }
    }
}

impl Entity for Account {
    type Id = AccountId;
    const KIND: &'static str = "account";

    fn id(&self) -> AccountId {
        self.id
    }

    fn owner(&self) -> Option<AccountId> {
        Some(self.id)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("handle", &self.handle)
            .field("email", &self.email)
            .field("credential_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}
