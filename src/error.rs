//! Custom error types for OnlineBank
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every kind a caller may need to branch on
//! is its own variant.

use thiserror::Error;

use crate::models::{AccountNumber, Money};

/// The main error type for OnlineBank operations
#[derive(Error, Debug)]
pub enum BankError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed customer input (mobile, aadhaar, name, password)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Amount was zero or negative
    #[error("Invalid amount: {0} (amount must be positive)")]
    InvalidAmount(Money),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Password did not match the stored hash
    #[error("Incorrect password for account {0}")]
    InvalidCredentials(AccountNumber),

    /// Insufficient funds
    #[error("Insufficient funds in account {account}: need {needed}, have {available}")]
    InsufficientFunds {
        account: AccountNumber,
        needed: Money,
        available: Money,
    },

    /// Crediting the amount would overflow the account balance
    #[error("Amount {amount} would overflow the balance of account {account}")]
    BalanceOverflow {
        account: AccountNumber,
        amount: Money,
    },

    /// Transfer source and destination are the same account
    #[error("Cannot transfer to the same account")]
    SameAccount,

    /// Password hashing failed
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BankError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.to_string(),
        }
    }

    /// Create a "duplicate" error for accounts
    pub fn duplicate_account(identifier: impl ToString) -> Self {
        Self::Duplicate {
            entity_type: "Account",
            identifier: identifier.to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidAmount(_) | Self::BalanceOverflow { .. }
        )
    }

    /// Check if the underlying persistence layer failed
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_) | Self::Json(_))
    }

    /// Render the message with amounts prefixed by `currency_symbol`
    ///
    /// `Display` keeps amounts bare for logs; this is what customers see.
    pub fn describe(&self, currency_symbol: &str) -> String {
        let money = |m: &Money| m.format_with_symbol(currency_symbol);
        match self {
            Self::InvalidAmount(amount) => {
                format!("Invalid amount: {} (amount must be positive)", money(amount))
            }
            Self::InsufficientFunds {
                account,
                needed,
                available,
            } => format!(
                "Insufficient funds in account {}: need {}, have {}",
                account,
                money(needed),
                money(available)
            ),
            Self::BalanceOverflow { account, amount } => format!(
                "Amount {} would overflow the balance of account {}",
                money(amount),
                account
            ),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for OnlineBank operations
pub type BankResult<T> = Result<T, BankError>;
