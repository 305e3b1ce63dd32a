//! OnlineBank - terminal-based online banking demo
//!
//! This library provides the core of a single-user banking application:
//! customer accounts protected by Argon2 password hashes, and deposit,
//! withdrawal, transfer, balance and deletion operations against a JSON
//! account store.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, account numbers, money)
//! - `crypto`: Password hashing and secure strings
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Business logic layer
//! - `cli`: Interactive menu shell
//!
//! # Example
//!
//! ```rust,ignore
//! use onlinebank::config::{BankPaths, Settings};
//! use onlinebank::crypto::Argon2Hasher;
//! use onlinebank::services::BankService;
//! use onlinebank::storage::Storage;
//!
//! let paths = BankPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(&paths)?;
//! storage.load_all()?;
//! let hasher = Argon2Hasher::new(&settings.hashing)?;
//!
//! let bank = BankService::new(&storage, &hasher, &settings);
//! let account = bank.create_account("John", "Doe", "9876543210", "123456789012", "pw1")?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BankError, BankResult};
