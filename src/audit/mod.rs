//! Audit logging
//!
//! Append-only JSONL log of account creation and record create, update and
//! delete operations. Entries carry IDs and field names, never values.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
