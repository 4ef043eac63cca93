//! Audit entry data structures
//!
//! An entry names the operation, the entity and which fields were touched.
//! Field values (plaintext or ciphertext) are never recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::RecordField;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Account,
    Record,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Account => write!(f, "Account"),
            EntityType::Record => write!(f, "Record"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// ID of the affected entity
    pub entity_id: String,

    /// Names of the fields written or removed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<RecordField>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        fields: Vec<RecordField>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            fields,
        }
    }

    pub fn create(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        fields: Vec<RecordField>,
    ) -> Self {
        Self::new(Operation::Create, entity_type, entity_id, fields)
    }

    pub fn update(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        fields: Vec<RecordField>,
    ) -> Self {
        Self::new(Operation::Update, entity_type, entity_id, fields)
    }

    pub fn delete(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self::new(Operation::Delete, entity_type, entity_id, Vec::new())
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if !self.fields.is_empty() {
            let names: Vec<&str> = self.fields.iter().map(|f| f.name()).collect();
            output.push_str(&format!(" [{}]", names.join(", ")));
        }

        output
    }
}
