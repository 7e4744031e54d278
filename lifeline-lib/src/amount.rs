//! Safe financial arithmetic using fixed-point decimal
//!
//! Contribution and campaign amounts are `Decimal` backed and serialize as
//! strings, so accumulated totals never drift.

use crate::{LifelineError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monetary amount with fixed-point precision
///
/// # Examples
///
/// ```rust
/// use lifeline_lib::Amount;
///
/// let a = Amount::from_units(1000);
/// let b = Amount::parse("250.50").unwrap();
/// let total = a.checked_add(&b).unwrap();
/// assert_eq!(total.to_string(), "1250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Create from whole currency units.
    pub fn from_units(units: i64) -> Self {
        Self {
            value: Decimal::from(units),
        }
    }

    /// Create from a `Decimal` value.
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Parse a decimal string (e.g., "123.45").
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not a decimal number.
    pub fn parse(s: &str) -> Result<Self> {
        Decimal::from_str(s.trim())
            .map(Self::new)
            .map_err(|e| LifelineError::validation("amount", e.to_string()))
    }

    /// Zero amount.
    pub fn zero() -> Self {
        Self {
            value: Decimal::ZERO,
        }
    }

    /// Check if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Check if amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Checked addition (returns None on overflow)
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.value.checked_add(other.value).map(Self::new)
    }

    /// Get the internal Decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for Amount {
    type Err = LifelineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}
