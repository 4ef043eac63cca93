//! Vault record model
//!
//! A record is a set of independently encrypted fields. Title, username and
//! password are always present; url and notes are optional. Each field is
//! sealed as a one-entry JSON object keyed by the field name, e.g.
//! `{"title":"GitHub"}`, under its own nonce.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ids::RecordId;
use crate::crypto::{decrypt, encrypt, EncryptedField, MasterKey};
use crate::error::{VaultError, VaultResult};

/// The logical fields of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordField {
    Title,
    Username,
    Password,
    Url,
    Notes,
}

impl RecordField {
    pub const ALL: [RecordField; 5] = [
        RecordField::Title,
        RecordField::Username,
        RecordField::Password,
        RecordField::Url,
        RecordField::Notes,
    ];

    /// Field name as used in the encrypted payload
    pub fn name(&self) -> &'static str {
        match self {
            RecordField::Title => "title",
            RecordField::Username => "username",
            RecordField::Password => "password",
            RecordField::Url => "url",
            RecordField::Notes => "notes",
        }
    }

    /// Whether every record must carry this field
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            RecordField::Title | RecordField::Username | RecordField::Password
        )
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordField {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordField::ALL
            .into_iter()
            .find(|field| field.name() == s.trim().to_lowercase())
            .ok_or_else(|| VaultError::InvalidInput(format!("Unknown field: {}", s)))
    }
}

/// Decrypted record contents
///
/// Lives only in memory and is zeroed on drop.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RecordFields {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl RecordFields {
    pub fn new(
        title: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            username: username.into(),
            password: password.into(),
            url: None,
            notes: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Read one field
    pub fn get(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Title => Some(&self.title),
            RecordField::Username => Some(&self.username),
            RecordField::Password => Some(&self.password),
            RecordField::Url => self.url.as_deref(),
            RecordField::Notes => self.notes.as_deref(),
        }
    }

    /// Validate before encryption
    pub fn validate(&self) -> VaultResult<()> {
        if self.title.trim().is_empty() {
            return Err(VaultError::InvalidInput("Record title cannot be empty".into()));
        }
        Ok(())
    }
}

// Passwords and notes never show up in debug output
impl fmt::Debug for RecordFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFields")
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("url", &self.url)
            .field("notes", &self.notes.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// `{"<field>": value}` without copying the value into a `serde_json::Value`
struct FieldPayload<'a> {
    field: RecordField,
    value: &'a str,
}

impl Serialize for FieldPayload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field.name(), self.value)?;
        map.end()
    }
}

fn seal_field(field: RecordField, value: &str, key: &MasterKey) -> VaultResult<EncryptedField> {
    encrypt(&FieldPayload { field, value }, key)
}

fn open_field(field: RecordField, sealed: &EncryptedField, key: &MasterKey) -> VaultResult<String> {
    let mut payload: BTreeMap<String, String> = decrypt(sealed, key)?;
    let value = payload.remove(field.name()).ok_or_else(|| {
        VaultError::MalformedPlaintext(format!("payload has no '{}' entry", field))
    });
    payload.values_mut().for_each(|v| v.zeroize());
    value
}

/// A record as held by the record store: ciphertext and nonces only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    pub id: RecordId,
    pub title: EncryptedField,
    pub username: EncryptedField,
    pub password: EncryptedField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<EncryptedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<EncryptedField>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EncryptedRecord {
    /// Encrypt a new record, every field under its own nonce
    ///
    /// Empty optional fields are not stored.
    pub fn seal(fields: &RecordFields, key: &MasterKey) -> VaultResult<Self> {
        fields.validate()?;
        let now = Utc::now();

        let optional = |field: RecordField| -> VaultResult<Option<EncryptedField>> {
            match fields.get(field) {
                Some(value) if !value.is_empty() => Ok(Some(seal_field(field, value, key)?)),
                _ => Ok(None),
            }
        };

        Ok(Self {
            id: RecordId::new(),
            title: seal_field(RecordField::Title, &fields.title, key)?,
            username: seal_field(RecordField::Username, &fields.username, key)?,
            password: seal_field(RecordField::Password, &fields.password, key)?,
            url: optional(RecordField::Url)?,
            notes: optional(RecordField::Notes)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// The stored ciphertext for a field, if present
    pub fn field(&self, field: RecordField) -> Option<&EncryptedField> {
        match field {
            RecordField::Title => Some(&self.title),
            RecordField::Username => Some(&self.username),
            RecordField::Password => Some(&self.password),
            RecordField::Url => self.url.as_ref(),
            RecordField::Notes => self.notes.as_ref(),
        }
    }

    /// Fields that have a stored value
    pub fn present_fields(&self) -> Vec<RecordField> {
        RecordField::ALL
            .into_iter()
            .filter(|field| self.field(*field).is_some())
            .collect()
    }

    /// Decrypt a single field
    pub fn open_field(&self, field: RecordField, key: &MasterKey) -> VaultResult<Option<String>> {
        self.field(field)
            .map(|sealed| open_field(field, sealed, key))
            .transpose()
    }

    /// Decrypt the whole record
    pub fn open(&self, key: &MasterKey) -> VaultResult<RecordFields> {
        Ok(RecordFields {
            title: open_field(RecordField::Title, &self.title, key)?,
            username: open_field(RecordField::Username, &self.username, key)?,
            password: open_field(RecordField::Password, &self.password, key)?,
            url: self.open_field(RecordField::Url, key)?,
            notes: self.open_field(RecordField::Notes, key)?,
        })
    }

    /// Replace one field with a freshly encrypted value
    ///
    /// `None` (or an empty string) clears an optional field. Mandatory fields
    /// cannot be cleared, and the title cannot be empty.
    pub fn set_field(
        &mut self,
        field: RecordField,
        value: Option<&str>,
        key: &MasterKey,
    ) -> VaultResult<()> {
        let value = value.filter(|v| !v.is_empty() || field.is_mandatory());

        if field == RecordField::Title && value.is_some_and(|v| v.trim().is_empty()) {
            return Err(VaultError::InvalidInput("Record title cannot be empty".into()));
        }

        let sealed = value.map(|v| seal_field(field, v, key)).transpose()?;

        match (field, sealed) {
            (RecordField::Url, sealed) => self.url = sealed,
            (RecordField::Notes, sealed) => self.notes = sealed,
            (RecordField::Title, Some(sealed)) => self.title = sealed,
            (RecordField::Username, Some(sealed)) => self.username = sealed,
            (RecordField::Password, Some(sealed)) => self.password = sealed,
            (mandatory, None) => {
                return Err(VaultError::InvalidInput(format!(
                    "Field '{}' is mandatory and cannot be cleared",
                    mandatory
                )));
            }
        }

        self.updated_at = Utc::now();
        Ok(())
    }
}
