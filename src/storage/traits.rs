//! Store interfaces
//!
//! The crypto core never talks to storage. These traits are the narrow
//! surfaces the service layer uses; every value crossing them is already
//! ciphertext, a nonce, a salt or KDF parameters.

use crate::error::VaultResult;
use crate::models::{AccountRecord, EncryptedRecord, RecordId};

/// Source of the account record
pub trait AccountStore {
    /// The account, if one has been created
    fn account(&self) -> VaultResult<Option<AccountRecord>>;

    /// Persist the account record
    ///
    /// The salt is immutable once written, so a second call fails with
    /// `VaultError::Duplicate`.
    fn create_account(&self, account: &AccountRecord) -> VaultResult<()>;
}

/// Holder of encrypted records
pub trait RecordStore {
    /// All records, newest first
    fn list(&self) -> VaultResult<Vec<EncryptedRecord>>;

    fn get(&self, id: RecordId) -> VaultResult<Option<EncryptedRecord>>;

    /// Add a new record (`Duplicate` if the id exists)
    fn insert(&self, record: &EncryptedRecord) -> VaultResult<()>;

    /// Replace an existing record (`NotFound` if missing)
    fn update(&self, record: &EncryptedRecord) -> VaultResult<()>;

    /// Remove a record and return it (`NotFound` if missing)
    fn delete(&self, id: RecordId) -> VaultResult<EncryptedRecord>;
}
