//! Path management for vault-cli
//!
//! ## Path Resolution Order
//!
//! 1. `VAULT_CLI_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/vault-cli` or `~/.config/vault-cli`
//! 3. Windows: `%APPDATA%\vault-cli`

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::VaultError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "VAULT_CLI_DATA_DIR";

/// Manages all paths used by vault-cli
#[derive(Debug, Clone)]
pub struct VaultPaths {
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create VaultPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the data directory (~/.config/vault-cli/data/)
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

    /// Get the path to account.json (salt and KDF parameters)
    pub fn account_file(&self) -> PathBuf {
        self.data_dir().join("account.json")
    }

    /// Get the path to records.json (encrypted records)
    pub fn records_file(&self) -> PathBuf {
        self.data_dir().join("records.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| VaultError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if an account has been created here
    pub fn is_initialized(&self) -> bool {
        self.account_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config"))
            .ok_or_else(|| VaultError::Config("Could not determine home directory".into()))?,
    };
    Ok(config_base.join("vault-cli"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| VaultError::Config("Could not determine APPDATA directory".into()))?;
    Ok(dirs.config_dir().join("vault-cli"))
}
