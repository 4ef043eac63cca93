//! Master key derivation
//!
//! Turns a low-entropy master password plus a 16-byte salt into a 256-bit
//! AES-GCM key. PBKDF2-HMAC-SHA-256 at 210,000 iterations is the default;
//! Argon2id is available for accounts that opt into it. The parameters used
//! are stored per account (see [`KdfParams`]) so the strength can be raised
//! for new accounts without breaking existing ones.

use std::fmt;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count for accounts created with the default parameters.
///
/// Existing accounts keep whatever count is stored in their [`KdfParams`].
pub const PBKDF2_ITERATIONS: u32 = 210_000;

// Argon2id floor values, below these derivation is refused
const ARGON2_MIN_MEMORY_KIB: u32 = 19 * 1024;
const ARGON2_MIN_TIME_COST: u32 = 2;

/// Per-account random salt
///
/// Not secret. Stored as standard base64 alongside the account record.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DerivationSalt([u8; SALT_LEN]);

impl DerivationSalt {
    /// Generate a fresh salt from the OS random source
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Build a salt from raw bytes, which must be exactly 16 long
    pub fn from_slice(bytes: &[u8]) -> VaultResult<Self> {
        let array: [u8; SALT_LEN] = bytes.try_into().map_err(|_| {
            VaultError::InvalidInput(format!(
                "salt must be {} bytes, got {}",
                SALT_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Parse a salt from its base64 storage form
    pub fn from_base64(encoded: &str) -> VaultResult<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| VaultError::InvalidInput(format!("Invalid salt encoding: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Encode the salt for storage
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivationSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DerivationSalt")
            .field(&self.to_base64())
            .finish()
    }
}

impl Serialize for DerivationSalt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for DerivationSalt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Key derivation parameters, persisted per account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "kebab-case")]
pub enum KdfParams {
    /// PBKDF2 with HMAC-SHA-256
    Pbkdf2Sha256 { iterations: u32 },
    /// Argon2id (v0x13)
    Argon2id {
        /// Memory cost in KiB
        memory_cost: u32,
        /// Time cost (passes)
        time_cost: u32,
        /// Parallelism degree
        parallelism: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Argon2id with 64 MiB memory, 3 passes, 4 lanes
    pub fn argon2id() -> Self {
        Self::Argon2id {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }

    /// Short algorithm name for display and logs
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            Self::Pbkdf2Sha256 { .. } => "pbkdf2-sha256",
            Self::Argon2id { .. } => "argon2id",
        }
    }

    /// Refuse parameters weaker than the supported minimum
    pub fn validate(&self) -> VaultResult<()> {
        match *self {
            Self::Pbkdf2Sha256 { iterations } => {
                if iterations < PBKDF2_ITERATIONS {
                    return Err(VaultError::InvalidInput(format!(
                        "pbkdf2 iterations {} is below minimum {}",
                        iterations, PBKDF2_ITERATIONS
                    )));
                }
            }
            Self::Argon2id {
                memory_cost,
                time_cost,
                parallelism,
            } => {
                if memory_cost < ARGON2_MIN_MEMORY_KIB {
                    return Err(VaultError::InvalidInput(format!(
                        "argon2 memory cost {} KiB is below minimum {}",
                        memory_cost, ARGON2_MIN_MEMORY_KIB
                    )));
                }
                if time_cost < ARGON2_MIN_TIME_COST {
                    return Err(VaultError::InvalidInput(format!(
                        "argon2 time cost {} is below minimum {}",
                        time_cost, ARGON2_MIN_TIME_COST
                    )));
                }
                if parallelism == 0 {
                    return Err(VaultError::InvalidInput(
                        "argon2 parallelism must be at least 1".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// The symmetric key derived from the master password
///
/// Only usable for AES-256-GCM inside this crate. The bytes are never
/// exposed, printed or serialized, and are zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LEN],
}

impl MasterKey {
    pub(crate) fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a master key with the default parameters
///
/// When `salt` is `None` a fresh random salt is generated. The salt actually
/// used is returned so the caller can persist it on first use.
pub fn derive_key(password: &str, salt: Option<&[u8]>) -> VaultResult<(MasterKey, DerivationSalt)> {
    derive_key_with_params(password, salt, &KdfParams::default())
}

/// Derive a master key with explicit (usually stored) parameters
pub fn derive_key_with_params(
    password: &str,
    salt: Option<&[u8]>,
    params: &KdfParams,
) -> VaultResult<(MasterKey, DerivationSalt)> {
    params.validate()?;
    derive_unchecked(password, salt, params)
}

fn derive_unchecked(
    password: &str,
    salt: Option<&[u8]>,
    params: &KdfParams,
) -> VaultResult<(MasterKey, DerivationSalt)> {
    if password.is_empty() {
        return Err(VaultError::InvalidInput("password must not be empty".into()));
    }

    let salt = match salt {
        Some(bytes) => DerivationSalt::from_slice(bytes)?,
        None => DerivationSalt::generate(),
    };

    let mut master = MasterKey { key: [0u8; KEY_LEN] };

    match *params {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            pbkdf2::pbkdf2_hmac::<Sha256>(
                password.as_bytes(),
                salt.as_bytes(),
                iterations,
                &mut master.key,
            );
        }
        KdfParams::Argon2id {
            memory_cost,
            time_cost,
            parallelism,
        } => {
            let argon2_params = Params::new(memory_cost, time_cost, parallelism, Some(KEY_LEN))
                .map_err(|e| VaultError::InvalidInput(format!("Invalid Argon2 parameters: {}", e)))?;

            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
                .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut master.key)
                .map_err(|e| VaultError::InvalidInput(format!("Key derivation failed: {}", e)))?;
        }
    }

    tracing::debug!(algorithm = params.algorithm_name(), "derived master key");

    Ok((master, salt))
}

/// Fast, deliberately weak derivation for unit tests elsewhere in the crate
#[cfg(test)]
pub(crate) fn test_key(password: &str) -> MasterKey {
    derive_unchecked(
        password,
        None,
        &KdfParams::Pbkdf2Sha256 { iterations: 1_000 },
    )
    .unwrap()
    .0
}
