//! Money type for account balances and transaction amounts
//!
//! Internally stores amounts in minor units (paise/cents, i64) to avoid
//! floating-point drift when balances are repeatedly incremented.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use thiserror::Error;

/// A monetary amount stored in hundredths of the currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use onlinebank::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from a whole number of currency units
    ///
    /// # Examples
    /// ```
    /// use onlinebank::models::Money;
    /// assert_eq!(Money::from_units(500).cents(), 50000);
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole currency units (truncated toward zero)
    pub const fn whole(&self) -> i64 {
        self.0 / 100
    }

    /// Fractional part (0-99)
    pub const fn fraction(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Add two amounts, returning `None` on overflow
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Parse an amount typed by a customer
    ///
    /// Accepts "500", "500.5", "500.50", "-20", and an optional leading
    /// currency symbol such as "$500" or "₹500". More than two decimal places
    /// are truncated.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(original.to_string());

        let (negative, rest) = match original.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, original),
        };
        let rest = rest.trim_start_matches(|c: char| c == '$' || c == '₹');

        let (whole_str, frac_str) = match rest.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (rest, ""),
        };

        if whole_str.is_empty() || !whole_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = whole_str.parse().map_err(|_| invalid())?;
        let frac: i64 = match frac_str.len() {
            0 => 0,
            1 => frac_str.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac_str[..2].parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or(MoneyParseError::OutOfRange(original.to_string()))?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.whole().abs(), self.fraction())
        } else {
            format!("{}{}.{:02}", symbol, self.whole(), self.fraction())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("Invalid amount: '{0}'. Use a format like '500' or '500.50'")]
    InvalidFormat(String),
    #[error("Amount out of range: '{0}'")]
    OutOfRange(String),
}
