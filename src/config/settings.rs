//! User settings for vault-cli
//!
//! Preferences that are not secret: which KDF new accounts use, generator
//! defaults, and whether record changes are written to the audit log.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::paths::VaultPaths;
use crate::crypto::KdfParams;
use crate::error::VaultError;
use crate::generator::GeneratorOptions;

/// KDF choice for accounts created from now on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KdfAlgorithm {
    /// PBKDF2-HMAC-SHA-256, 210,000 iterations
    #[default]
    Pbkdf2,
    /// Argon2id, 64 MiB
    Argon2id,
}

impl KdfAlgorithm {
    /// Default parameters for this algorithm
    pub fn params(&self) -> KdfParams {
        match self {
            KdfAlgorithm::Pbkdf2 => KdfParams::default(),
            KdfAlgorithm::Argon2id => KdfParams::argon2id(),
        }
    }
}

/// User settings for vault-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// KDF for new accounts; existing accounts keep their stored parameters
    #[serde(default)]
    pub kdf_algorithm: KdfAlgorithm,

    /// Defaults for `vault generate`
    #[serde(default)]
    pub generator: GeneratorOptions,

    /// Whether record changes are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            kdf_algorithm: KdfAlgorithm::default(),
            generator: GeneratorOptions::default(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &VaultPaths) -> Result<Self, VaultError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| VaultError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                VaultError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultPaths) -> Result<(), VaultError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| VaultError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
