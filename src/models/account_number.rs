//! Account number newtype
//!
//! Account numbers are the only identifier a customer ever sees. They are
//! 12-digit decimal integers drawn uniformly at random, so a leading zero is
//! never possible and the printed form is always exactly 12 characters.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 12-digit public account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct AccountNumber(u64);

impl AccountNumber {
    pub const MIN: u64 = 100_000_000_000;
    pub const MAX: u64 = 999_999_999_999;

    /// Draw a fresh random account number from the thread-local RNG
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Draw a random account number from the given RNG
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:012}", self.0)
    }
}

impl TryFrom<u64> for AccountNumber {
    type Error = AccountNumberError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AccountNumberError::OutOfRange(value))
        }
    }
}

impl From<AccountNumber> for u64 {
    fn from(number: AccountNumber) -> Self {
        number.0
    }
}

impl FromStr for AccountNumber {
    type Err = AccountNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 12 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountNumberError::InvalidFormat(s.to_string()));
        }
        let value: u64 = s
            .parse()
            .map_err(|_| AccountNumberError::InvalidFormat(s.to_string()))?;
        Self::try_from(value)
    }
}

/// Errors produced when an account number is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountNumberError {
    #[error("Invalid account number '{0}': expected 12 digits")]
    InvalidFormat(String),
    #[error("Account number {0} is outside the 12-digit range")]
    OutOfRange(u64),
}
