//! Configuration module for OnlineBank
//!
//! - XDG-compliant path resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::BankPaths;
pub use settings::Settings;
