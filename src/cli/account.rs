//! Account CLI commands
//!
//! `vault init` creates the account; `vault status` reports on it.

use crate::config::{KdfAlgorithm, Settings};
use crate::crypto::KdfParams;
use crate::error::{VaultError, VaultResult};
use crate::services::AccountService;
use crate::session::VaultSession;
use crate::storage::{AccountStore, Storage};

use super::prompt::new_master_password;

/// Create the vault account
pub fn handle_init(
    storage: &Storage,
    settings: &mut Settings,
    name: &str,
    kdf: Option<KdfAlgorithm>,
) -> VaultResult<()> {
    if storage.is_initialized() {
        return Err(VaultError::Duplicate {
            entity_type: "Account",
            identifier: storage.paths().account_file().display().to_string(),
        });
    }

    if let Some(kdf) = kdf {
        settings.kdf_algorithm = kdf;
    }
    let params = settings.kdf_algorithm.params();

    println!("Initializing vault at: {}", storage.paths().base_dir().display());
    println!();
    println!("Records are encrypted with a key derived from your master password.");
    println!("IMPORTANT: If you forget it, your records cannot be recovered!");
    println!();

    let password = new_master_password()?;

    println!("Deriving key ({})...", params.algorithm_name());
    let mut service = AccountService::new(&storage.account);
    if settings.audit_enabled {
        service = service.with_audit(storage.audit());
    }

    let mut session = VaultSession::new();
    let account = service.create_account(name, &password, &params, &mut session)?;
    settings.save(storage.paths())?;
    session.lock();

    println!("Created account '{}' ({})", account.name, account.id);
    println!();
    println!("Run 'vault add <title> --username <name>' to store your first record.");
    Ok(())
}

/// Show account and storage status
pub fn handle_status(storage: &Storage) -> VaultResult<()> {
    println!("Vault Status");
    println!("============");
    println!("Location: {}", storage.paths().base_dir().display());

    let Some(account) = storage.account.account()? else {
        println!("Account:  (none)");
        println!();
        println!("Run 'vault init' to create one.");
        return Ok(());
    };

    println!("Account:  {} ({})", account.name, account.id);
    println!("Created:  {}", account.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("KDF:      {}", describe_kdf(&account.kdf));
    println!("Salt:     {}", account.salt.to_base64());
    println!("Records:  {}", storage.records.count()?);
    Ok(())
}

fn describe_kdf(kdf: &KdfParams) -> String {
    match *kdf {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            format!("{} ({} iterations)", kdf.algorithm_name(), iterations)
        }
        KdfParams::Argon2id {
            memory_cost,
            time_cost,
            parallelism,
        } => format!(
            "{} (m={} KiB, t={}, p={})",
            kdf.algorithm_name(),
            memory_cost,
            time_cost,
            parallelism
        ),
    }
}
