//! Service layer for vault-cli
//!
//! The service layer sits between the CLI and storage: it validates input,
//! seals and opens records with the session key, and writes the audit log.

pub mod account;
pub mod vault;

pub use account::AccountService;
pub use vault::{RecordSummary, VaultService};
