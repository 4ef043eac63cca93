//! Account repository for JSON storage
//!
//! Reads and writes account.json. The file is written once, when the
//! account is created; the salt in it never changes afterwards.

use std::path::PathBuf;

use crate::error::{VaultError, VaultResult};
use crate::models::AccountRecord;

use super::file_io::{read_json_optional, write_json_atomic};
use super::traits::AccountStore;

/// Repository for the account record
pub struct AccountRepository {
    path: PathBuf,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl AccountStore for AccountRepository {
    fn account(&self) -> VaultResult<Option<AccountRecord>> {
        read_json_optional(&self.path)
    }

    fn create_account(&self, account: &AccountRecord) -> VaultResult<()> {
        if self.exists() {
            return Err(VaultError::Duplicate {
                entity_type: "Account",
                identifier: self.path.display().to_string(),
            });
        }
        write_json_atomic(&self.path, account)
    }
}
