//! Configuration module for vault-cli
//!
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::VaultPaths;
pub use settings::{KdfAlgorithm, Settings};
