//! Audit logging system for OnlineBank
//!
//! Records every completed account creation, deposit, withdrawal, transfer
//! and deletion in an append-only JSONL file.
//!
//! - `AuditEntry`: one operation with its account numbers, amount and the
//!   resulting balance.
//! - `AuditLogger`: appends entries to the audit log and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
