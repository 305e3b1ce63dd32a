//! Storage layer for OnlineBank
//!
//! Provides the JSON-backed account store with atomic writes, plus the
//! audit trail that records completed mutations.

pub mod accounts;
pub mod file_io;

pub use accounts::{AccountRepository, TransferBalances};
pub use file_io::{read_json, write_json_atomic};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::BankPaths;
use crate::error::BankError;

/// Storage handle passed to the service layer
pub struct Storage {
    pub accounts: AccountRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: &BankPaths) -> Result<Self, BankError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            audit: AuditLogger::new(paths.audit_log()),
        })
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BankError> {
        self.accounts.load()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append an audit entry for an operation that already completed
    ///
    /// The mutation is durable by the time this runs, so a failing audit
    /// write is reported to diagnostics instead of failing the operation.
    pub fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            tracing::error!(
                operation = %entry.operation,
                account = %entry.account_number,
                "failed to write audit entry: {}",
                e
            );
        }
    }
}
