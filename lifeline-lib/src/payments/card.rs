//! Card backend.

use super::simulator::{ApprovalPolicy, RandomApproval, SimulatedNetwork};
use super::traits::{fields, CredentialPayload, PaymentGateway, PaymentTransaction, ValidationResult};
use crate::config::PaymentConfig;
use crate::{Amount, Result};
use async_trait::async_trait;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

pub const CARD_GATEWAY: &str = "card";

/// Card payments: 13-19 digit number, 3-4 digit CVV.
///
/// Approval is simulated; see [`super::simulator`].
#[derive(Clone, Debug)]
pub struct CardGateway {
    network: SimulatedNetwork,
}

impl CardGateway {
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            network: SimulatedNetwork {
                name: CARD_GATEWAY,
                id_prefix: "TXN",
                policy: Arc::new(RandomApproval::new(config.card_approval_rate)),
                latency: config.latency(),
            },
        }
    }

    /// Replace the approval policy.
    pub fn with_policy(mut self, policy: Arc<dyn ApprovalPolicy>) -> Self {
        self.network.policy = policy;
        self
    }

    pub fn with_latency(mut self, latency: RangeInclusive<Duration>) -> Self {
        self.network.latency = latency;
        self
    }
}

impl Default for CardGateway {
    fn default() -> Self {
        Self::new(&PaymentConfig::default())
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[async_trait]
impl PaymentGateway for CardGateway {
    fn gateway_name(&self) -> &str {
        CARD_GATEWAY
    }

    fn validate(&self, payload: &CredentialPayload) -> ValidationResult {
        let mut errors = Vec::new();

        match payload.get(fields::CARD_NUMBER) {
            None => errors.push("card number is required".to_string()),
            Some(number) => {
                let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
                if !all_digits(&digits) || !(13..=19).contains(&digits.len()) {
                    errors.push("card number must be 13 to 19 digits".to_string());
                }
            }
        }

        match payload.get(fields::CVV) {
            None => errors.push("CVV is required".to_string()),
            Some(cvv) if !all_digits(cvv) || !(3..=4).contains(&cvv.len()) => {
                errors.push("CVV must be 3 or 4 digits".to_string())
            }
            Some(_) => {}
        }

        ValidationResult::from_errors(errors)
    }

    #[tracing::instrument(skip(self, payload))]
    async fn authorize(
        &self,
        payer: &str,
        amount: &Amount,
        payload: &CredentialPayload,
    ) -> Result<PaymentTransaction> {
        let validation = self.validate(payload);
        Ok(self.network.authorize(payer, amount, validation).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::simulator::{AlwaysApprove, AlwaysDecline};

    fn gateway() -> CardGateway {
        CardGateway::new(&PaymentConfig::default().without_latency())
    }

    #[test]
    fn test_validate_card_numbers() {
        let gw = gateway();
        assert!(!gw.validate(&CredentialPayload::card("411111111111", "123")).is_valid());
        assert!(gw.validate(&CredentialPayload::card("4111 1111 1111 1111", "123")).is_valid());
        assert!(gw.validate(&CredentialPayload::card("4111111111111", "1234")).is_valid());
        assert!(!gw.validate(&CredentialPayload::card("41111111111111111111", "123")).is_valid());
        assert!(!gw.validate(&CredentialPayload::card("4111-1111-1111-1111", "123")).is_valid());
    }

    #[test]
    fn test_validate_cvv() {
        let gw = gateway();
        assert!(!gw.validate(&CredentialPayload::card("4111111111111111", "12a")).is_valid());
        assert!(!gw.validate(&CredentialPayload::card("4111111111111111", "12")).is_valid());
        assert!(!gw.validate(&CredentialPayload::card("4111111111111111", "12345")).is_valid());

        let missing = gw.validate(&CredentialPayload::new());
        assert_eq!(missing.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_authorize_approved() {
        let gw = gateway().with_policy(Arc::new(AlwaysApprove));
        let tx = gw
            .authorize("Asha", &Amount::from_units(500), &CredentialPayload::card("4111111111111111", "123"))
            .await
            .unwrap();
        assert!(tx.is_approved());
        assert!(tx.transaction_id.unwrap().starts_with("TXN"));
        assert_eq!(tx.gateway, "card");
    }

    #[tokio::test]
    async fn test_authorize_declines_without_error() {
        let payload = CredentialPayload::card("4111111111111111", "123");
        let gw = gateway().with_policy(Arc::new(AlwaysDecline));
        let tx = gw.authorize("Asha", &Amount::from_units(500), &payload).await.unwrap();
        assert!(!tx.is_approved());
        assert!(tx.transaction_id.is_none());

        let gw = gateway().with_policy(Arc::new(AlwaysApprove));
        let bad = CredentialPayload::card("12", "x");
        let tx = gw.authorize("Asha", &Amount::from_units(500), &bad).await.unwrap();
        assert!(!tx.is_approved());
        assert!(tx.reason.unwrap().contains("card number"));
    }
}
