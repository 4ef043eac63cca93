//! Account service
//!
//! Creates the single vault account and unlocks sessions against it.

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::crypto::{derive_key_with_params, KdfParams};
use crate::error::{VaultError, VaultResult};
use crate::models::AccountRecord;
use crate::session::VaultSession;
use crate::storage::AccountStore;

/// Service for account creation and unlock
pub struct AccountService<'a> {
    store: &'a dyn AccountStore,
    audit: Option<&'a AuditLogger>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(store: &'a dyn AccountStore) -> Self {
        Self { store, audit: None }
    }

    /// Record account creation in the audit log
    pub fn with_audit(mut self, logger: &'a AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Create the account and leave `session` unlocked with the new key
    ///
    /// A fresh random salt is generated here and never changes afterwards.
    pub fn create_account(
        &self,
        name: &str,
        password: &str,
        params: &KdfParams,
        session: &mut VaultSession,
    ) -> VaultResult<AccountRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VaultError::InvalidInput("Account name cannot be empty".into()));
        }

        if let Some(existing) = self.store.account()? {
            return Err(VaultError::Duplicate {
                entity_type: "Account",
                identifier: existing.name,
            });
        }

        let (key, salt) = derive_key_with_params(password, None, params)?;
        let account = AccountRecord::new(name, salt, *params, &key)?;
        self.store.create_account(&account)?;

        // The account is committed; a failed audit write must not undo that
        if let Some(audit) = self.audit {
            let entry =
                AuditEntry::create(EntityType::Account, account.id.to_string(), Vec::new());
            if let Err(e) = audit.log(&entry) {
                tracing::warn!(account = %account.id, error = %e, "failed to write audit entry");
            }
        }

        tracing::info!(
            account = %account.id,
            algorithm = params.algorithm_name(),
            "account created"
        );
        session.install(key, salt);
        Ok(account)
    }

    /// The stored account
    pub fn account(&self) -> VaultResult<AccountRecord> {
        self.store
            .account()?
            .ok_or_else(|| VaultError::account_not_found("run `vault init` first"))
    }

    /// Re-derive the key from the stored salt and parameters and unlock
    ///
    /// A wrong master password fails with `AuthenticationFailure` and leaves
    /// `session` untouched.
    pub fn unlock(&self, password: &str, session: &mut VaultSession) -> VaultResult<()> {
        let account = self.account()?;
        let (key, salt) =
            derive_key_with_params(password, Some(&account.salt.as_bytes()[..]), &account.kdf)?;

        if let Err(e) = account.verify_key(&key) {
            tracing::warn!(account = %account.id, "unlock failed");
            return Err(e);
        }

        session.install(key, salt);
        Ok(())
    }
}
