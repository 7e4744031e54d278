//! Configuration types for the Lifeline core.
//!
//! Every field has a serde default, so a partial JSON document (or `{}`)
//! yields a usable configuration.

use crate::{LifelineError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LifelineConfig {
    /// Credential hashing parameters.
    #[serde(default)]
    pub credentials: CredentialConfig,

    /// Payment simulator parameters.
    #[serde(default)]
    pub payments: PaymentConfig,

    /// Matching engine parameters.
    #[serde(default)]
    pub matching: MatchingConfig,
}

impl LifelineConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LifelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LifelineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<()> {
        self.credentials.validate()?;
        self.payments.validate()
    }

    /// Replace the payment section.
    pub fn with_payments(mut self, payments: PaymentConfig) -> Self {
        self.payments = payments;
        self
    }

    /// Replace the matching section.
    pub fn with_matching(mut self, matching: MatchingConfig) -> Self {
        self.matching = matching;
        self
    }
}

/// Argon2 parameters for the credential verifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl CredentialConfig {
    /// Cheap parameters for tests and development.
    pub fn fast() -> Self {
        Self {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 || self.parallelism == 0 {
            return Err(LifelineError::Config(
                "argon2 iterations and parallelism must be at least 1".to_string(),
            ));
        }
        if self.memory_kib < 8 * self.parallelism {
            return Err(LifelineError::Config(format!(
                "argon2 memory_kib must be at least {}",
                8 * self.parallelism
            )));
        }
        Ok(())
    }
}

/// Parameters for the simulated payment network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Probability that a valid card authorization is approved.
    #[serde(default = "default_card_rate")]
    pub card_approval_rate: f64,

    /// Probability that a valid UPI authorization is approved.
    #[serde(default = "default_upi_rate")]
    pub upi_approval_rate: f64,

    /// Lower bound of the simulated network latency.
    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,

    /// Upper bound of the simulated network latency.
    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,
}

fn default_card_rate() -> f64 {
    0.95
}

fn default_upi_rate() -> f64 {
    0.98
}

fn default_latency_min_ms() -> u64 {
    800
}

fn default_latency_max_ms() -> u64 {
    1000
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            card_approval_rate: default_card_rate(),
            upi_approval_rate: default_upi_rate(),
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
        }
    }
}

impl PaymentConfig {
    /// Set both latency bounds.
    pub fn with_latency_ms(mut self, min: u64, max: u64) -> Self {
        self.latency_min_ms = min;
        self.latency_max_ms = max;
        self
    }

    /// Disable simulated latency.
    pub fn without_latency(self) -> Self {
        self.with_latency_ms(0, 0)
    }

    /// Latency window as durations.
    pub fn latency(&self) -> RangeInclusive<Duration> {
        Duration::from_millis(self.latency_min_ms)..=Duration::from_millis(self.latency_max_ms)
    }

    fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("card_approval_rate", self.card_approval_rate),
            ("upi_approval_rate", self.upi_approval_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(LifelineError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        if self.latency_min_ms > self.latency_max_ms {
            return Err(LifelineError::Config(format!(
                "latency_min_ms ({}) exceeds latency_max_ms ({})",
                self.latency_min_ms, self.latency_max_ms
            )));
        }
        Ok(())
    }
}

/// How a location filter is compared against an entity's location.
///
/// Both modes trim surrounding whitespace and ignore ASCII/Unicode case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationMatch {
    /// The filter must appear somewhere in the entity's location.
    #[default]
    Substring,
    /// The filter must equal the entity's location.
    Exact,
}

impl LocationMatch {
    /// Compare a filter against a candidate location.
    pub fn matches(&self, filter: &str, candidate: &str) -> bool {
        let filter = filter.trim().to_lowercase();
        let candidate = candidate.trim().to_lowercase();
        match self {
            Self::Substring => candidate.contains(&filter),
            Self::Exact => candidate == filter,
        }
    }
}

/// Matching engine parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Location comparison mode.
    #[serde(default)]
    pub location_match: LocationMatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config = LifelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, LifelineConfig::default());
        assert_eq!(config.payments.card_approval_rate, 0.95);
        assert_eq!(config.payments.upi_approval_rate, 0.98);
        assert_eq!(config.matching.location_match, LocationMatch::Substring);
    }

    #[test]
    fn test_partial_json() {
        let config = LifelineConfig::from_json_str(
            r#"{"payments": {"latency_min_ms": 0, "latency_max_ms": 0},
                "matching": {"location_match": "exact"}}"#,
        )
        .unwrap();
        assert_eq!(config.payments.latency_max_ms, 0);
        assert_eq!(config.payments.card_approval_rate, 0.95);
        assert_eq!(config.matching.location_match, LocationMatch::Exact);
    }

    #[test]
    fn test_rejects_bad_rates_and_latency() {
        let err = LifelineConfig::from_json_str(r#"{"payments": {"upi_approval_rate": 1.5}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("upi_approval_rate"));

        let err = LifelineConfig::from_json_str(
            r#"{"payments": {"latency_min_ms": 10, "latency_max_ms": 5}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("latency_min_ms"));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let err = LifelineConfig::from_json_str(r#"{"credentials": {"iterations": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, LifelineError::Config(_)));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifeline.json");
        std::fs::write(&path, r#"{"matching": {"location_match": "exact"}}"#).unwrap();

        let config = LifelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.matching.location_match, LocationMatch::Exact);

        assert!(LifelineConfig::from_json_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_location_match_modes() {
        assert!(LocationMatch::Substring.matches("pune", "Pune, Maharashtra"));
        assert!(LocationMatch::Substring.matches("  PUNE ", "pune"));
        assert!(!LocationMatch::Exact.matches("pune", "Pune, Maharashtra"));
        assert!(LocationMatch::Exact.matches("pune", " Pune "));
        assert!(!LocationMatch::Substring.matches("mumbai", "Pune"));
    }
}
