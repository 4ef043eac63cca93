//! Core data models for vault-cli
//!
//! The account record (salt and KDF parameters) and vault records, which
//! exist in plaintext only in memory and as ciphertext everywhere else.

pub mod account;
pub mod ids;
pub mod record;

pub use account::AccountRecord;
pub use ids::{AccountId, RecordId};
pub use record::{EncryptedRecord, RecordField, RecordFields};
