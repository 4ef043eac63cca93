//! Master password input
//!
//! The password is taken from `VAULT_MASTER_PASSWORD` when set, otherwise
//! read from the terminal with echo disabled.

use crate::crypto::SecureString;
use crate::error::{VaultError, VaultResult};
use crate::session::VaultSession;
use crate::services::AccountService;
use crate::storage::Storage;

/// Environment variable holding the master password for non-interactive use
pub const MASTER_PASSWORD_ENV: &str = "VAULT_MASTER_PASSWORD";

/// Minimum length for a new master password
pub const MIN_PASSWORD_LEN: usize = 8;

fn from_env() -> Option<SecureString> {
    std::env::var(MASTER_PASSWORD_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(SecureString::from)
}

/// Prompt for a secret (hidden input)
pub fn prompt_secret(prompt: &str) -> VaultResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| VaultError::Io(format!("Failed to read password: {}", e)))
}

/// The master password for an existing account
pub fn master_password() -> VaultResult<SecureString> {
    match from_env() {
        Some(password) => Ok(password),
        None => prompt_secret("Master password: "),
    }
}

/// A new master password, confirmed when typed interactively
pub fn new_master_password() -> VaultResult<SecureString> {
    if let Some(password) = from_env() {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(VaultError::InvalidInput(format!(
                "Master password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        return Ok(password);
    }

    loop {
        let first = prompt_secret("New master password: ")?;

        if first.len() < MIN_PASSWORD_LEN {
            eprintln!(
                "Master password must be at least {} characters. Please try again.",
                MIN_PASSWORD_LEN
            );
            continue;
        }

        let second = prompt_secret("Confirm master password: ")?;

        if first != second {
            eprintln!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

/// Read the master password and unlock a new session
pub fn unlock(storage: &Storage) -> VaultResult<VaultSession> {
    let password = master_password()?;
    let mut session = VaultSession::new();
    AccountService::new(&storage.account).unlock(&password, &mut session)?;
    Ok(session)
}
