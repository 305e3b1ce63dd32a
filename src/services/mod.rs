//! Service layer for OnlineBank
//!
//! Business logic on top of the storage layer: validation, authentication
//! and the account operations.

pub mod bank;

pub use bank::{BankService, TransferReceipt};
