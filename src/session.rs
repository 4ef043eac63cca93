//! Unlock session
//!
//! Holds the master key for as long as the vault is unlocked. The key is
//! passed explicitly to cipher calls via [`VaultSession::key`] and is dropped
//! (and zeroed) on [`VaultSession::lock`] or when the session goes away.

use chrono::{DateTime, Utc};

use crate::crypto::{derive_key_with_params, DerivationSalt, KdfParams, MasterKey};
use crate::error::{VaultError, VaultResult};

enum State {
    Locked,
    Unlocked {
        key: MasterKey,
        salt: DerivationSalt,
        since: DateTime<Utc>,
    },
}

/// An in-memory unlock session
pub struct VaultSession {
    state: State,
}

impl Default for VaultSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultSession {
    /// Create a locked session
    pub fn new() -> Self {
        Self {
            state: State::Locked,
        }
    }

    /// Derive the key with the default parameters and unlock
    ///
    /// `salt` is the account's stored salt, or `None` on first use, in which
    /// case a fresh one is generated and available through [`Self::salt`].
    pub fn unlock(&mut self, password: &str, salt: Option<&[u8]>) -> VaultResult<&MasterKey> {
        self.unlock_with_params(password, salt, &KdfParams::default())
    }

    /// Derive the key with explicit parameters and unlock
    pub fn unlock_with_params(
        &mut self,
        password: &str,
        salt: Option<&[u8]>,
        params: &KdfParams,
    ) -> VaultResult<&MasterKey> {
        let (key, salt) = derive_key_with_params(password, salt, params)?;
        Ok(self.install(key, salt))
    }

    /// Replace any current key with an already derived one
    pub(crate) fn install(&mut self, key: MasterKey, salt: DerivationSalt) -> &MasterKey {
        self.state = State::Unlocked {
            key,
            salt,
            since: Utc::now(),
        };
        tracing::info!("vault unlocked");
        match &self.state {
            State::Unlocked { key, .. } => key,
            State::Locked => unreachable!("state was just set to unlocked"),
        }
    }

    /// Drop the key
    pub fn lock(&mut self) {
        if !self.is_locked() {
            tracing::info!("vault locked");
        }
        self.state = State::Locked;
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, State::Locked)
    }

    /// The master key, or [`VaultError::Locked`]
    pub fn key(&self) -> VaultResult<&MasterKey> {
        match &self.state {
            State::Unlocked { key, .. } => Ok(key),
            State::Locked => Err(VaultError::Locked),
        }
    }

    /// The salt the current key was derived with
    pub fn salt(&self) -> Option<&DerivationSalt> {
        match &self.state {
            State::Unlocked { salt, .. } => Some(salt),
            State::Locked => None,
        }
    }

    /// When the session was unlocked
    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            State::Unlocked { since, .. } => Some(*since),
            State::Locked => None,
        }
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("locked", &self.is_locked())
            .field("unlocked_at", &self.unlocked_at())
            .finish()
    }
}
