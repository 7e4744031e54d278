//! Error types for Lifeline operations.
//!
//! Expected outcomes are not errors here: a credential mismatch is
//! `Ok(false)` from login and a declined payment is a
//! [`PaymentTransaction`](crate::payments::PaymentTransaction) with a
//! declined status. Everything below is surfaced to the caller unchanged and
//! never retried by the core.

use crate::Amount;
use thiserror::Error;

/// Error codes for embedding hosts (presentation shells, FFI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum LifelineErrorCode {
    /// No authenticated session
    Unauthenticated = 3000,
    /// Authenticated, but the role or ownership does not permit the operation
    Unauthorized = 3001,
    /// Entity not found
    NotFound = 4000,
    /// Validation failed
    Validation = 5001,
    /// Serialization error
    Serialization = 5002,
    /// Payment backend fault
    Gateway = 6000,
    /// Approved payment that could not be recorded
    UnrecordedPayment = 6001,
    /// Storage error
    Storage = 7000,
    /// Invalid configuration
    Config = 9000,
}

/// Error type for Lifeline operations.
#[derive(Debug, Error)]
pub enum LifelineError {
    /// Malformed input: bad role, malformed credential payload, non-positive amount.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The caller context holds no authenticated account.
    #[error("no authenticated session")]
    Unauthenticated,

    /// The caller's role or ownership does not permit the operation.
    #[error("not authorized to {operation}: {reason}")]
    Unauthorized {
        /// Operation that was refused
        operation: String,
        /// Why it was refused
        reason: String,
    },

    /// Entity not found in persistence.
    #[error("{resource_type} not found: {identifier}")]
    NotFound {
        /// Type of resource (e.g., "donor profile", "campaign")
        resource_type: String,
        /// Resource identifier
        identifier: String,
    },

    /// Persistence collaborator failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Unrecoverable payment backend condition (not a decline).
    #[error("payment gateway {gateway} failed: {reason}")]
    Gateway {
        /// Gateway name
        gateway: String,
        /// Underlying failure
        reason: String,
    },

    /// The gateway approved a payment but recording it failed. The
    /// transaction id identifies the payment for reconciliation.
    #[error("payment {transaction_id} of {amount} approved but not recorded: {reason}")]
    UnrecordedPayment {
        /// Gateway-assigned transaction id
        transaction_id: String,
        /// Approved amount
        amount: Amount,
        /// Why recording failed
        reason: Box<LifelineError>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LifelineError {
    /// Get the error code for host integration.
    pub fn code(&self) -> LifelineErrorCode {
        match self {
            Self::Validation { .. } => LifelineErrorCode::Validation,
            Self::Unauthenticated => LifelineErrorCode::Unauthenticated,
            Self::Unauthorized { .. } => LifelineErrorCode::Unauthorized,
            Self::NotFound { .. } => LifelineErrorCode::NotFound,
            Self::Storage(_) => LifelineErrorCode::Storage,
            Self::Gateway { .. } => LifelineErrorCode::Gateway,
            Self::UnrecordedPayment { .. } => LifelineErrorCode::UnrecordedPayment,
            Self::Serialization(_) => LifelineErrorCode::Serialization,
            Self::Config(_) => LifelineErrorCode::Config,
        }
    }

    /// Returns true if the failure came from a collaborator and a caller
    /// could reasonably try again. The core itself never retries. An
    /// unrecorded payment is not retryable: the money has already moved.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Gateway { .. })
    }

    /// True for both authorization failure kinds.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Unauthorized { .. })
    }

    /// Create a validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an authorization refusal.
    pub fn unauthorized(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, identifier: impl ToString) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.to_string(),
        }
    }

    /// Create a storage error from any error type.
    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        Self::Storage(err.to_string())
    }

    /// Create a gateway fault.
    pub fn gateway(gateway: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Gateway {
            gateway: gateway.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LifelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
