//! UPI backend.

use super::simulator::{ApprovalPolicy, RandomApproval, SimulatedNetwork};
use super::traits::{fields, CredentialPayload, PaymentGateway, PaymentTransaction, ValidationResult};
use crate::config::PaymentConfig;
use crate::{Amount, Result};
use async_trait::async_trait;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

pub const UPI_GATEWAY: &str = "upi";

/// UPI payments: a `user@bank` identifier and a 4-6 digit PIN.
#[derive(Clone, Debug)]
pub struct UpiGateway {
    network: SimulatedNetwork,
}

impl UpiGateway {
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            network: SimulatedNetwork {
                name: UPI_GATEWAY,
                id_prefix: "UPI",
                policy: Arc::new(RandomApproval::new(config.upi_approval_rate)),
                latency: config.latency(),
            },
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn ApprovalPolicy>) -> Self {
        self.network.policy = policy;
        self
    }

    pub fn with_latency(mut self, latency: RangeInclusive<Duration>) -> Self {
        self.network.latency = latency;
        self
    }
}

impl Default for UpiGateway {
    fn default() -> Self {
        Self::new(&PaymentConfig::default())
    }
}

fn valid_upi_id(id: &str) -> bool {
    let mut parts = id.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(user), Some(bank), None) => !user.trim().is_empty() && !bank.trim().is_empty(),
        _ => false,
    }
}

#[async_trait]
impl PaymentGateway for UpiGateway {
    fn gateway_name(&self) -> &str {
        UPI_GATEWAY
    }

    fn validate(&self, payload: &CredentialPayload) -> ValidationResult {
        let mut errors = Vec::new();

        match payload.get(fields::UPI_ID) {
            Some(id) if valid_upi_id(id) => {}
            Some(_) => errors.push("UPI id must look like user@bank".to_string()),
            None => errors.push("UPI id is required".to_string()),
        }

        match payload.get(fields::PIN) {
            Some(pin) if (4..=6).contains(&pin.len()) && pin.bytes().all(|b| b.is_ascii_digit()) => {}
            Some(_) => errors.push("PIN must be 4 to 6 digits".to_string()),
            None => errors.push("PIN is required".to_string()),
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
