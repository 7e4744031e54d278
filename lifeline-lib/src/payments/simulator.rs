//! Simulated payment network shared by the bundled gateways.
//!
//! There is no real network behind the card and UPI backends. After
//! validation they wait a random latency and then ask an
//! [`ApprovalPolicy`] whether to approve. The policy is injected so tests
//! can force the outcome; production wiring uses [`RandomApproval`].

use super::traits::{PaymentTransaction, ValidationResult};
use crate::Amount;
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

/// Decides whether a well-formed payment is approved.
pub trait ApprovalPolicy: Send + Sync + fmt::Debug {
    fn approve(&self) -> bool;
}

/// Approve with fixed probability, independent of the payment.
#[derive(Clone, Copy, Debug)]
pub struct RandomApproval {
    rate: f64,
}

impl RandomApproval {
    /// `rate` is clamped to `[0, 1]`.
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self { rate }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl ApprovalPolicy for RandomApproval {
    fn approve(&self) -> bool {
        rand::thread_rng().gen_bool(self.rate)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysApprove;

impl ApprovalPolicy for AlwaysApprove {
    fn approve(&self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysDecline;

impl ApprovalPolicy for AlwaysDecline {
    fn approve(&self) -> bool {
        false
    }
}

/// Pick a latency uniformly from `range`, millisecond resolution.
pub fn sample_latency(range: &RangeInclusive<Duration>) -> Duration {
    let min = range.start().as_millis() as u64;
    let max = range.end().as_millis() as u64;
    if min >= max {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}

/// Fresh transaction identifier, e.g. `TXN5F3A9C0B12D4`.
pub fn transaction_id(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}{}", prefix, &id[..12])
}

/// The authorization flow common to simulated backends.
#[derive(Clone, Debug)]
pub(crate) struct SimulatedNetwork {
    pub name: &'static str,
    pub id_prefix: &'static str,
    pub policy: Arc<dyn ApprovalPolicy>,
    pub latency: RangeInclusive<Duration>,
}

impl SimulatedNetwork {
    /// Decline malformed requests immediately; otherwise wait out the
    /// latency and consult the policy.
    ///
    /// Nothing is recorded before the final return, so a future dropped
    /// during the wait leaves no trace.
    pub async fn authorize(&self, payer: &str, amount: &Amount, validation: ValidationResult) -> PaymentTransaction {
        let payer = payer.trim();
        let decline = |reason: String| {
            tracing::debug!(gateway = self.name, %reason, "payment declined");
            PaymentTransaction::declined(self.name, payer, *amount, reason)
        };

        if !amount.is_positive() {
            return decline("amount must be greater than zero".into());
        }
        if payer.is_empty() {
            return decline("payer name is required".into());
        }
        if !validation.is_valid() {
            return decline(validation.errors.join("; "));
        }

        tokio::time::sleep(sample_latency(&self.latency)).await;

        if !self.policy.approve() {
            return decline("declined by issuer".into());
        }
        let id = transaction_id(self.id_prefix);
        tracing::info!(gateway = self.name, transaction = %id, %amount, "payment approved");
        PaymentTransaction::approved(self.name, payer, *amount, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_format() {
        let id = transaction_id("TXN");
        assert!(id.starts_with("TXN"));
        assert_eq!(id.len(), 15);
        assert_ne!(transaction_id("TXN"), id);
    }

    #[test]
    fn test_latency_sample_in_range() {
        let range = Duration::from_millis(800)..=Duration::from_millis(1000);
        for _ in 0..100 {
            let d = sample_latency(&range);
            assert!(range.contains(&d));
        }
        let fixed = Duration::ZERO..=Duration::ZERO;
        assert_eq!(sample_latency(&fixed), Duration::ZERO);
    }

    #[test]
    fn test_random_policy_extremes() {
        assert!((0..50).all(|_| RandomApproval::new(1.0).approve()));
        assert!((0..50).all(|_| !RandomApproval::new(0.0).approve()));
        assert_eq!(RandomApproval::new(3.0).rate(), 1.0);
        assert_eq!(RandomApproval::new(f64::NAN).rate(), 0.0);
    }
}
