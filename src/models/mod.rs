//! Core data models for OnlineBank
//!
//! Accounts, their public account numbers, and the money type used for
//! balances and amounts.

pub mod account;
pub mod account_number;
pub mod money;

pub use account::{Account, AccountValidationError};
pub use account_number::{AccountNumber, AccountNumberError};
pub use money::{Money, MoneyParseError};
