// File Operations for RSA Keys and Results
// Key export/import as JSON and saving encryption/decryption output

use std::fs;
use std::io;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::RsaError;
use crate::rsa::keygen::{derive_keys, KeyPair};

/// Errors that can occur during file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid key file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("key derivation failed: {0}")]
    Key(#[from] RsaError),

    #[error("no content to save")]
    EmptyContent,
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Exported key record. Only p, q and e are trusted on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    #[serde(default = "default_p")]
    pub p: u64,
    #[serde(default = "default_q")]
    pub q: u64,
    #[serde(default = "default_e")]
    pub e: u64,
    #[serde(default)]
    pub d: Option<u64>,
    #[serde(default)]
    pub n: Option<u64>,
    #[serde(default)]
    pub phi: Option<u64>,
    /// ISO-8601 export time
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn default_p() -> u64 {
    3
}

fn default_q() -> u64 {
    11
}

fn default_e() -> u64 {
    3
}

impl KeyRecord {
    /// Snapshot a key pair, stamped with the current local time
    pub fn from_keys(keys: &KeyPair) -> Self {
        Self {
            p: keys.p,
            q: keys.q,
            e: keys.e,
            d: Some(keys.d),
            n: Some(keys.n),
            phi: Some(keys.phi),
            timestamp: Some(Local::now().to_rfc3339()),
        }
    }

    /// Re-derive the key pair from p, q and e. Stored d, n and phi are only
    /// compared against the fresh values.
    pub fn derive(&self) -> Result<KeyPair, RsaError> {
        let keys = derive_keys(self.p, self.q, self.e)?;

        let stale = [
            ("d", self.d, keys.d),
            ("n", self.n, keys.n),
            ("phi", self.phi, keys.phi),
        ];
        for (field, stored, derived) in stale {
            if let Some(stored) = stored.filter(|&s| s != derived) {
                warn!(field, stored, derived, "stored key value does not match re-derived value");
            }
        }

        Ok(keys)
    }
}

/// Write a key pair as pretty-printed JSON
pub fn export_keys(path: &Path, keys: &KeyPair) -> FileResult<KeyRecord> {
    let record = KeyRecord::from_keys(keys);
    let json = serde_json::to_string_pretty(&record)?;
    write_text(path, &json)?;
    info!(path = %path.display(), "exported keys");
    Ok(record)
}

/// Read a key file without deriving anything from it
pub fn import_record(path: &Path) -> FileResult<KeyRecord> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load a key file and re-run key derivation on its p, q and e
pub fn import_keys(path: &Path) -> FileResult<KeyPair> {
    let keys = import_record(path)?.derive()?;
    info!(path = %path.display(), n = keys.n, "imported keys");
    Ok(keys)
}

/// Save an encryption/decryption result. Empty content is refused.
pub fn save_result(path: &Path, content: &str) -> FileResult<()> {
    if content.trim().is_empty() {
        return Err(FileError::EmptyContent);
    }
    write_text(path, content)?;
    info!(path = %path.display(), "saved result");
    Ok(())
}

/// Read a whole text file
pub fn read_text(path: &Path) -> FileResult<String> {
    Ok(fs::read_to_string(path)?)
}

/// Write text to a file, creating parent directories
pub fn write_text(path: &Path, content: &str) -> FileResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
