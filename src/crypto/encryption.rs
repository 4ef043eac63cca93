//! AES-256-GCM field encryption
//!
//! Each call to [`encrypt`] serializes a value to JSON, draws a fresh 96-bit
//! nonce and seals it with no associated data. Every record field is an
//! independent [`EncryptedField`] with its own nonce.
//!
//! Ciphertext length tracks plaintext length; fields are not padded.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::Nonce;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};

use super::MasterKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// One encrypted logical value, as stored in the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    /// Ciphertext with the GCM tag appended (base64)
    pub ciphertext: String,
    /// The nonce used for this encryption (base64)
    pub nonce: String,
}

impl EncryptedField {
    fn new(nonce: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            ciphertext: STANDARD.encode(ciphertext),
            nonce: STANDARD.encode(nonce),
        }
    }
}

/// Encrypt a serializable value under the master key
pub fn encrypt<T: Serialize + ?Sized>(value: &T, key: &MasterKey) -> VaultResult<EncryptedField> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(value)
            .map_err(|e| VaultError::Json(format!("Failed to serialize field: {}", e)))?,
    );
    seal(&plaintext, key)
}

/// Decrypt a field and parse it back into `T`
///
/// Any authentication problem yields [`VaultError::AuthenticationFailure`];
/// a payload that decrypts but does not parse yields
/// [`VaultError::MalformedPlaintext`].
pub fn decrypt<T: DeserializeOwned>(field: &EncryptedField, key: &MasterKey) -> VaultResult<T> {
    let plaintext = open(field, key)?;
    // serde_json messages can quote the input, so only the position is kept
    serde_json::from_slice(&plaintext).map_err(|e| {
        VaultError::MalformedPlaintext(format!(
            "{:?} error at line {} column {}",
            e.classify(),
            e.line(),
            e.column()
        ))
    })
}

pub(crate) fn seal(plaintext: &[u8], key: &MasterKey) -> VaultResult<EncryptedField> {
    let cipher = key.cipher();

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| VaultError::InvalidInput("Encryption failed".into()))?;

    Ok(EncryptedField::new(&nonce_bytes, &ciphertext))
}

pub(crate) fn open(field: &EncryptedField, key: &MasterKey) -> VaultResult<Zeroizing<Vec<u8>>> {
    let nonce_bytes = STANDARD
        .decode(&field.nonce)
        .map_err(|_| VaultError::AuthenticationFailure)?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(VaultError::AuthenticationFailure);
    }
    let ciphertext = STANDARD
        .decode(&field.ciphertext)
        .map_err(|_| VaultError::AuthenticationFailure)?;

    let plaintext = key
        .cipher()
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| VaultError::AuthenticationFailure)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::test_key;
    use serde_json::json;
    use std::collections::HashSet;

    fn flip_bit(encoded: &str, bit: usize) -> String {
        let mut bytes = STANDARD.decode(encoded).unwrap();
        bytes[bit / 8] ^= 1 << (bit % 8);
        STANDARD.encode(bytes)
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = test_key("test_passphrase");
        let value = json!({"title": "GitHub"});

        let encrypted = encrypt(&value, &key).unwrap();
        let decrypted: serde_json::Value = decrypt(&encrypted, &key).unwrap();

        assert_eq!(value, decrypted);
    }

    #[test]
    fn test_encrypt_decrypt_string() {
        let key = test_key("test_passphrase");

        let encrypted = encrypt("hunter2", &key).unwrap();
        let decrypted: String = decrypt(&encrypted, &key).unwrap();

        assert_eq!(decrypted, "hunter2");
    }

    #[test]
    fn test_nonce_is_12_bytes() {
        let key = test_key("test_passphrase");
        let encrypted = encrypt("value", &key).unwrap();
        assert_eq!(STANDARD.decode(&encrypted.nonce).unwrap().len(), NONCE_SIZE);
    }

    #[test]
    fn test_nonces_unique_over_many_encryptions() {
        let key = test_key("test_passphrase");
        let mut seen = HashSet::new();

        for _ in 0..500 {
            let encrypted = encrypt("same value", &key).unwrap();
            assert!(seen.insert(encrypted.nonce));
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = test_key("test_passphrase");
        let key2 = test_key("different_passphrase");

        let encrypted = encrypt("secret", &key1).unwrap();
        let result: VaultResult<String> = decrypt(&encrypted, &key2);

        assert!(matches!(result, Err(VaultError::AuthenticationFailure)));
    }

    #[test]
    fn test_every_ciphertext_bit_flip_detected() {
        let key = test_key("test_passphrase");
        let encrypted = encrypt("GitHub", &key).unwrap();
        let bits = STANDARD.decode(&encrypted.ciphertext).unwrap().len() * 8;

        for bit in 0..bits {
            let tampered = EncryptedField {
                ciphertext: flip_bit(&encrypted.ciphertext, bit),
                nonce: encrypted.nonce.clone(),
            };
            let result: VaultResult<String> = decrypt(&tampered, &key);
            assert!(
                matches!(result, Err(VaultError::AuthenticationFailure)),
                "bit {} not detected",
                bit
            );
        }
    }

    #[test]
    fn test_every_nonce_bit_flip_detected() {
        let key = test_key("test_passphrase");
        let encrypted = encrypt("GitHub", &key).unwrap();

        for bit in 0..NONCE_SIZE * 8 {
            let tampered = EncryptedField {
                ciphertext: encrypted.ciphertext.clone(),
                nonce: flip_bit(&encrypted.nonce, bit),
            };
            let result: VaultResult<String> = decrypt(&tampered, &key);
            assert!(matches!(result, Err(VaultError::AuthenticationFailure)));
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let key = test_key("test_passphrase");
        let encrypted = encrypt("GitHub", &key).unwrap();

        let mut bytes = STANDARD.decode(&encrypted.ciphertext).unwrap();
        bytes.pop();
        let truncated = EncryptedField {
            ciphertext: STANDARD.encode(bytes),
            nonce: encrypted.nonce,
        };

        let result: VaultResult<String> = decrypt(&truncated, &key);
        assert!(matches!(result, Err(VaultError::AuthenticationFailure)));
    }

    #[test]
    fn test_garbage_encoding_is_authentication_failure() {
        let key = test_key("test_passphrase");
        let encrypted = encrypt("GitHub", &key).unwrap();

        let bad_nonce = EncryptedField {
            ciphertext: encrypted.ciphertext.clone(),
            nonce: "not base64!".into(),
        };
        let short_nonce = EncryptedField {
            ciphertext: encrypted.ciphertext,
            nonce: STANDARD.encode([0u8; 8]),
        };

        assert!(matches!(
            decrypt::<String>(&bad_nonce, &key),
            Err(VaultError::AuthenticationFailure)
        ));
        assert!(matches!(
            decrypt::<String>(&short_nonce, &key),
            Err(VaultError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_malformed_plaintext() {
        let key = test_key("test_passphrase");
        let sealed = seal(b"{not json", &key).unwrap();

        let result: VaultResult<serde_json::Value> = decrypt(&sealed, &key);
        assert!(matches!(result, Err(VaultError::MalformedPlaintext(_))));
    }

    #[test]
    fn test_malformed_plaintext_does_not_leak_content() {
        let key = test_key("test_passphrase");
        let encrypted = encrypt("topsecret", &key).unwrap();

        let err = decrypt::<u32>(&encrypted, &key).unwrap_err();
        assert!(matches!(err, VaultError::MalformedPlaintext(_)));
        assert!(!err.to_string().contains("topsecret"));
    }

    #[test]
    fn test_empty_string() {
        let key = test_key("test_passphrase");

        let encrypted = encrypt("", &key).unwrap();
        let decrypted: String = decrypt(&encrypted, &key).unwrap();

        assert_eq!(decrypted, "");
    }

    #[test]
    fn test_large_plaintext() {
        let key = test_key("test_passphrase");
        let notes: String = "lorem ipsum ".repeat(1000);

        let encrypted = encrypt(&notes, &key).unwrap();
        let decrypted: String = decrypt(&encrypted, &key).unwrap();

        assert_eq!(notes, decrypted);
    }
}
