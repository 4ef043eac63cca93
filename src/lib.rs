//! vault-cli - terminal password vault with client-side envelope encryption
//!
//! Every record field is encrypted with AES-256-GCM under a master key
//! derived from the user's master password (PBKDF2-HMAC-SHA-256 or
//! Argon2id). Only ciphertext, nonces, the salt and KDF parameters are ever
//! written to disk.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: Key derivation and authenticated encryption
//! - `generator`: Random password generation
//! - `session`: Locked/unlocked state holding the master key
//! - `models`: Account and record types
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `config`: Configuration and path management
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use vault_cli::crypto::{decrypt, derive_key, encrypt};
//!
//! let (key, salt) = derive_key("correct-horse-battery-staple", None)?;
//! let sealed = encrypt(&serde_json::json!({"title": "GitHub"}), &key)?;
//! let value: serde_json::Value = decrypt(&sealed, &key)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod generator;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{VaultError, VaultResult};
pub use session::VaultSession;
