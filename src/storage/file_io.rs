//! JSON file I/O with atomic writes
//!
//! A store write either lands completely or not at all: data goes to a
//! sibling temp file, is synced, and is then renamed over the target.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BankError;

fn storage_err(action: &str, path: &Path, e: impl std::fmt::Display) -> BankError {
    BankError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, BankError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| storage_err("open", path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| storage_err("parse", path, e))
}

/// Write JSON to a file atomically (write to temp, sync, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BankError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_err("create directory", parent, e))?;
    }

    // Temp file must live on the same filesystem for rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let result = (|| {
        let file = File::create(&temp_path).map_err(|e| storage_err("create", &temp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|e| storage_err("serialize", path, e))?;
        writer.flush().map_err(|e| storage_err("flush", &temp_path, e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| storage_err("sync", &temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| storage_err("replace", path, e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
