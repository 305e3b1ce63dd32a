//! Account model
//!
//! A customer's bank account: identity metadata, balance and the salted
//! password hash used to gate withdrawals, transfers and deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::account_number::AccountNumber;
use super::money::Money;

pub const MOBILE_DIGITS: usize = 10;
pub const AADHAAR_DIGITS: usize = 12;

/// A customer account record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Public 12-digit identifier
    pub account_number: AccountNumber,

    /// First and last name joined by a single space
    pub customer_name: String,

    /// 10-digit mobile number
    pub mobile_num: String,

    /// 12-digit Aadhaar number (format-validated only)
    pub aadhaar_num: String,

    /// Current balance, never negative
    pub balance: Money,

    /// PHC-encoded salted password hash
    pub password_hash: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(
        account_number: AccountNumber,
        first_name: &str,
        last_name: &str,
        mobile_num: impl Into<String>,
        aadhaar_num: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            account_number,
            customer_name: format!("{} {}", first_name.trim(), last_name.trim()),
            mobile_num: mobile_num.into(),
            aadhaar_num: aadhaar_num.into(),
            balance: Money::zero(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the balance and bump the modification time
    pub fn set_balance(&mut self, balance: Money) {
        self.balance = balance;
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.customer_name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        validate_mobile(&self.mobile_num)?;
        validate_aadhaar(&self.aadhaar_num)?;
        if self.balance.is_negative() {
            return Err(AccountValidationError::NegativeBalance(self.balance));
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.customer_name, self.account_number)
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Check that a mobile number is exactly 10 digits
pub fn validate_mobile(mobile: &str) -> Result<(), AccountValidationError> {
    if is_digits(mobile, MOBILE_DIGITS) {
        Ok(())
    } else {
        Err(AccountValidationError::InvalidMobile(mobile.to_string()))
    }
}

/// Check that an Aadhaar number is exactly 12 digits
pub fn validate_aadhaar(aadhaar: &str) -> Result<(), AccountValidationError> {
    if is_digits(aadhaar, AADHAAR_DIGITS) {
        Ok(())
    } else {
        Err(AccountValidationError::InvalidAadhaar(aadhaar.to_string()))
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    #[error("Customer name cannot be empty")]
    EmptyName,
    #[error("Invalid mobile number '{0}': expected exactly 10 digits")]
    InvalidMobile(String),
    #[error("Invalid Aadhaar number '{0}': expected exactly 12 digits")]
    InvalidAadhaar(String),
    #[error("Balance cannot be negative ({0})")]
    NegativeBalance(Money),
}
