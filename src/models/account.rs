//! Account model
//!
//! The account record holds everything needed to re-derive the master key:
//! the salt and the KDF parameters it was created with. Both are public.
//! A small encrypted token lets an unlock detect a wrong master password
//! before any record is touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::AccountId;
use crate::crypto::{decrypt, encrypt, DerivationSalt, EncryptedField, KdfParams, MasterKey};
use crate::error::{VaultError, VaultResult};

/// Plaintext sealed into the key check
const KEY_CHECK_TOKEN: &str = "vault_verify";

/// The per-account record held by the account store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,

    /// Display name, e.g. an email address
    pub name: String,

    /// Salt for key derivation (base64 on disk)
    pub salt: DerivationSalt,

    /// Parameters the key was derived with
    #[serde(default)]
    pub kdf: KdfParams,

    /// Encrypted known token, used to verify the master password
    pub key_check: EncryptedField,

    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    /// Create the record for a freshly derived key
    pub fn new(
        name: impl Into<String>,
        salt: DerivationSalt,
        kdf: KdfParams,
        key: &MasterKey,
    ) -> VaultResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VaultError::InvalidInput("Account name cannot be empty".into()));
        }

        Ok(Self {
            id: AccountId::new(),
            name,
            salt,
            kdf,
            key_check: encrypt(KEY_CHECK_TOKEN, key)?,
            created_at: Utc::now(),
        })
    }

    /// Check that `key` was derived from this account's master password
    pub fn verify_key(&self, key: &MasterKey) -> VaultResult<()> {
        let token: String = decrypt(&self.key_check, key)?;
        if token != KEY_CHECK_TOKEN {
            return Err(VaultError::AuthenticationFailure);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::test_key;

    #[test]
    fn test_verify_key() {
        let key = test_key("pw");
        let account =
            AccountRecord::new("me@example.com", DerivationSalt::generate(), KdfParams::default(), &key)
                .unwrap();

        assert!(account.verify_key(&key).is_ok());
        assert!(matches!(
            account.verify_key(&test_key("other")),
            Err(VaultError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let key = test_key("pw");
        let result = AccountRecord::new(" ", DerivationSalt::generate(), KdfParams::default(), &key);
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_serialization_keeps_salt_and_params() {
        let key = test_key("pw");
        let salt = DerivationSalt::generate();
        let account = AccountRecord::new("me", salt, KdfParams::argon2id(), &key).unwrap();

        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains(&salt.to_base64()));
        assert!(json.contains("argon2id"));

        let loaded: AccountRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.salt, salt);
        assert_eq!(loaded.kdf, KdfParams::argon2id());
        assert!(loaded.verify_key(&key).is_ok());
    }
}
