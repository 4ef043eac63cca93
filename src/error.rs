//! Custom error types for vault-cli
//!
//! This module defines the error hierarchy for the vault using thiserror.
//! No variant ever carries a password, a key or decrypted plaintext.

use thiserror::Error;

/// The main error type for vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Malformed arguments (empty password, wrong salt length, bad options)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ciphertext failed to authenticate
    ///
    /// Covers tampering, a wrong key, a wrong nonce and corrupted storage
    /// uniformly. The message is fixed so callers cannot tell them apart.
    #[error("Cannot decrypt: authentication failed")]
    AuthenticationFailure,

    /// Decryption succeeded but the payload did not parse back
    #[error("Decrypted payload is malformed: {0}")]
    MalformedPlaintext(String),

    /// Password generator was configured with no character classes
    #[error("No character sets selected")]
    NoAlphabetSelected,

    /// The session is locked and no key is available
    #[error("Vault is locked")]
    Locked,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl VaultError {
    /// Create a "not found" error for vault records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for the account
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an authentication failure
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailure)
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;
