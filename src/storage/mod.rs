//! Storage layer for vault-cli
//!
//! JSON file storage with atomic writes. Only ciphertext, nonces, the salt
//! and KDF parameters ever reach disk.

pub mod account;
pub mod file_io;
pub mod records;
pub mod traits;

pub use account::AccountRepository;
pub use file_io::{read_json, write_json_atomic};
pub use records::RecordRepository;
pub use traits::{AccountStore, RecordStore};

use crate::audit::AuditLogger;
use crate::config::paths::VaultPaths;
use crate::error::VaultError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: VaultPaths,
    pub account: AccountRepository,
    pub records: RecordRepository,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: VaultPaths) -> Result<Self, VaultError> {
        paths.ensure_directories()?;

        Ok(Self {
            account: AccountRepository::new(paths.account_file()),
            records: RecordRepository::new(paths.records_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), VaultError> {
        self.records.load()
    }

    /// Check if an account has been created
    pub fn is_initialized(&self) -> bool {
        self.account.exists()
    }
}
