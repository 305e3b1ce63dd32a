//! User settings for OnlineBank
//!
//! Display preferences, password hashing cost, and the account-number
//! collision retry limit. Every field has a default so older or hand-edited
//! config files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::BankPaths;
use crate::crypto::HashingParams;
use crate::error::BankError;

/// Settings for OnlineBank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown next to balances
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Argon2 cost parameters for new password hashes
    #[serde(default)]
    pub hashing: HashingParams,

    /// How many random account numbers to try before giving up on a collision
    #[serde(default = "default_account_number_attempts")]
    pub account_number_attempts: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_account_number_attempts() -> u32 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            hashing: HashingParams::default(),
            account_number_attempts: default_account_number_attempts(),
        }
    }
}

impl Settings {
    /// Load settings from disk, writing the defaults on first run
    pub fn load_or_create(paths: &BankPaths) -> Result<Self, BankError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            let settings = Settings::default();
            settings.save(paths)?;
            return Ok(settings);
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BankError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| BankError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BankPaths) -> Result<(), BankError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BankError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BankError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.account_number_attempts, 5);
        assert_eq!(settings.hashing, HashingParams::default());
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().join("fresh"));

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(paths.settings_file().exists());

        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "$".into();
        settings.account_number_attempts = 2;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"currency_symbol": "$"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.account_number_attempts, 5);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let result = Settings::load_or_create(&paths);
        assert!(matches!(result, Err(BankError::Config(_))));
    }
}
