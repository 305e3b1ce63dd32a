//! Path management for OnlineBank
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` flag or `ONLINEBANK_DATA_DIR` environment variable
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/onlinebank` or `~/.config/onlinebank`
//! 3. Windows: `%APPDATA%\onlinebank`

use std::path::{Path, PathBuf};

use crate::error::BankError;

pub const DATA_DIR_ENV: &str = "ONLINEBANK_DATA_DIR";

/// Manages all paths used by OnlineBank
#[derive(Debug, Clone)]
pub struct BankPaths {
    base_dir: PathBuf,
}

impl BankPaths {
    /// Resolve the base directory from the environment or platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BankError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create BankPaths with a custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to accounts.json
    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BankError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BankError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BankError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BankError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME")
                .map_err(|_| BankError::Config("Could not determine HOME directory".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("onlinebank"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BankError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BankError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("onlinebank"))
}
