// Configuration
// TOML settings for default keys, codec options and logging

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rsa::bigint::Precision;
use crate::rsa::codec::{CodecOptions, WhitespacePolicy};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default key parameters
    #[serde(default)]
    pub keys: KeysConfig,
    /// Codec and arithmetic options
    #[serde(default)]
    pub codec: CodecConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default p, q and e
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysConfig {
    #[serde(default = "default_p")]
    pub p: u64,
    #[serde(default = "default_q")]
    pub q: u64,
    #[serde(default = "default_e")]
    pub e: u64,
}

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CodecConfig {
    /// Map . , ! ? ; to 27-31
    #[serde(default)]
    pub include_punctuation: bool,
    /// Which whitespace maps to 32
    #[serde(default)]
    pub whitespace: WhitespacePolicy,
    /// Route modular exponentiation through arbitrary-precision integers
    #[serde(default)]
    pub use_large_numbers: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values: the p=3, q=11, e=3 textbook example

fn default_p() -> u64 {
    3
}

fn default_q() -> u64 {
    11
}

fn default_e() -> u64 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            p: default_p(),
            q: default_q(),
            e: default_e(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CodecConfig {
    /// Codec options with an explicit punctuation choice
    pub fn options(&self, include_punctuation: bool) -> CodecOptions {
        CodecOptions::new(include_punctuation).with_whitespace(self.whitespace)
    }

    pub fn precision(&self) -> Precision {
        Precision::from_large_numbers(self.use_large_numbers)
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("rsa-toy/config.toml")
    }

    /// Load config from the default path, falling back to defaults when it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration. Primes are checked by key derivation, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}
