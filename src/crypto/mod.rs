//! Client-side envelope encryption
//!
//! Derives an AES-256-GCM master key from the master password and uses it to
//! encrypt individual record fields. Plaintext and keys stay in this process.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt, encrypt, EncryptedField, NONCE_SIZE};
pub use key_derivation::{
    derive_key, derive_key_with_params, DerivationSalt, KdfParams, MasterKey, PBKDF2_ITERATIONS,
    SALT_LEN,
};
pub use secure_memory::SecureString;
