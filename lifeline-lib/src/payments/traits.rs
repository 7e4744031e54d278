//! Payment gateway contract.
//!
//! A gateway validates a backend-specific [`CredentialPayload`] and
//! authorizes a payment against it. Callers pick the gateway; adding a
//! backend means implementing [`PaymentGateway`] and nothing else.

use crate::{Amount, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroize;

/// Well-known payload field names.
pub mod fields {
    pub const CARD_NUMBER: &str = "card_number";
    pub const CVV: &str = "cvv";
    pub const UPI_ID: &str = "upi_id";
    pub const PIN: &str = "pin";
}

/// Backend-specific payment credentials.
///
/// Values never appear in `Debug` output and are zeroized on drop.
#[derive(Clone, Default)]
pub struct CredentialPayload {
    fields: BTreeMap<String, String>,
}

impl CredentialPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Card number and CVV.
    pub fn card(number: impl Into<String>, cvv: impl Into<String>) -> Self {
        Self::new()
            .with(fields::CARD_NUMBER, number)
            .with(fields::CVV, cvv)
    }

    /// UPI identifier (`user@bank`) and PIN.
    pub fn upi(id: impl Into<String>, pin: impl Into<String>) -> Self {
        Self::new().with(fields::UPI_ID, id).with(fields::PIN, pin)
    }

    /// Set a field, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(mut old) = self.fields.insert(key.into(), value.into()) {
            old.zeroize();
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Field names present, without values.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Debug for CredentialPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPayload")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Drop for CredentialPayload {
    fn drop(&mut self) {
        for value in self.fields.values_mut() {
            value.zeroize();
        }
    }
}

/// Outcome of checking a payload against a gateway's format rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    /// Human-readable problems. Never contains credential values.
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }

    /// Valid when no errors were collected.
    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::valid()
        } else {
            Self::invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Terminal outcome of an authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Approved,
    Declined,
}

/// Result of one authorization attempt. Not persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub payer: String,
    pub amount: Amount,
    /// [`PaymentGateway::gateway_name`] of the backend used.
    pub gateway: String,
    pub status: PaymentStatus,
    /// Assigned only when approved.
    pub transaction_id: Option<String>,
    /// Why the payment was declined.
    pub reason: Option<String>,
    pub executed_at: DateTime<Utc>,
}

impl PaymentTransaction {
    pub fn approved(
        gateway: impl Into<String>,
        payer: impl Into<String>,
        amount: Amount,
        transaction_id: String,
    ) -> Self {
        Self {
            payer: payer.into(),
            amount,
            gateway: gateway.into(),
            status: PaymentStatus::Approved,
            transaction_id: Some(transaction_id),
            reason: None,
            executed_at: Utc::now(),
        }
    }

    pub fn declined(
        gateway: impl Into<String>,
        payer: impl Into<String>,
        amount: Amount,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            payer: payer.into(),
            amount,
            gateway: gateway.into(),
            status: PaymentStatus::Declined,
            transaction_id: None,
            reason: Some(reason.into()),
            executed_at: Utc::now(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == PaymentStatus::Approved
    }
}

/// A payment backend.
///
/// `authorize` reports invalid input and declines as a
/// [`PaymentStatus::Declined`] transaction. `Err` is reserved for backend
/// faults ([`LifelineError::Gateway`](crate::LifelineError::Gateway)).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Stable backend name, e.g. `"card"`.
    fn gateway_name(&self) -> &str;

    /// Check the payload's format without contacting the backend.
    fn validate(&self, payload: &CredentialPayload) -> ValidationResult;

    /// Authorize `amount` from `payer`.
    ///
    /// Dropping the returned future before it completes has no effect.
    async fn authorize(
        &self,
        payer: &str,
        amount: &Amount,
        payload: &CredentialPayload,
    ) -> Result<PaymentTransaction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_debug_is_redacted() {
        let payload = CredentialPayload::card("4111111111111111", "123");
        let debug = format!("{:?}", payload);
        assert!(debug.contains("card_number"));
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("123"));
    }

    #[test]
    fn test_payload_fields() {
        let payload = CredentialPayload::upi("alice@hdfc", "1234").with(fields::PIN, "5678");
        assert_eq!(payload.get(fields::UPI_ID), Some("alice@hdfc"));
        assert_eq!(payload.get(fields::PIN), Some("5678"));
        assert_eq!(payload.keys().count(), 2);
        assert_eq!(payload.get(fields::CVV), None);
    }

    #[test]
    fn test_validation_result() {
        assert!(ValidationResult::from_errors(vec![]).is_valid());
        let invalid = ValidationResult::from_errors(vec!["bad".into()]);
        assert!(!invalid.is_valid());
        assert_eq!(invalid.errors.len(), 1);
    }

    #[test]
    fn test_declined_has_no_transaction_id() {
        let tx = PaymentTransaction::declined("card", "Asha", Amount::zero(), "amount");
        assert!(!tx.is_approved());
        assert!(tx.transaction_id.is_none());
        assert_eq!(tx.reason.as_deref(), Some("amount"));

        let tx = PaymentTransaction::approved("card", "Asha", Amount::from_units(5), "TXN1".into());
        assert!(tx.is_approved());
        assert_eq!(tx.transaction_id.as_deref(), Some("TXN1"));
    }
}
