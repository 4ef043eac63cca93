//! Record repository for JSON storage
//!
//! Manages loading and saving encrypted records to records.json. The file
//! holds ciphertext and nonces only.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{VaultError, VaultResult};
use crate::models::{EncryptedRecord, RecordId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::RecordStore;

/// Serializable record data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RecordData {
    records: Vec<EncryptedRecord>,
}

/// Repository for record persistence
pub struct RecordRepository {
    path: PathBuf,
    data: RwLock<HashMap<RecordId, EncryptedRecord>>,
}

impl RecordRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load records from disk
    pub fn load(&self) -> VaultResult<()> {
        let file_data: RecordData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for record in file_data.records {
            data.insert(record.id, record);
        }

        tracing::debug!(count = data.len(), "loaded records");
        Ok(())
    }

    /// Save records to disk
    pub fn save(&self) -> VaultResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = RecordData {
            records: sorted(data.values().cloned().collect()),
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn count(&self) -> VaultResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

fn sorted(mut records: Vec<EncryptedRecord>) -> Vec<EncryptedRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}

impl RecordStore for RecordRepository {
    fn list(&self) -> VaultResult<Vec<EncryptedRecord>> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted(data.values().cloned().collect()))
    }

    fn get(&self, id: RecordId) -> VaultResult<Option<EncryptedRecord>> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    fn insert(&self, record: &EncryptedRecord) -> VaultResult<()> {
        {
            let mut data = self
                .data
                .write()
                .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

            if data.contains_key(&record.id) {
                return Err(VaultError::Duplicate {
                    entity_type: "Record",
                    identifier: record.id.to_string(),
                });
            }
            data.insert(record.id, record.clone());
        }
        self.save()
    }

    fn update(&self, record: &EncryptedRecord) -> VaultResult<()> {
        {
            let mut data = self
                .data
                .write()
                .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

            match data.get_mut(&record.id) {
                Some(existing) => *existing = record.clone(),
                None => return Err(VaultError::record_not_found(record.id.to_string())),
            }
        }
        self.save()
    }

    fn delete(&self, id: RecordId) -> VaultResult<EncryptedRecord> {
        let removed = {
            let mut data = self
                .data
                .write()
                .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

            data.remove(&id)
                .ok_or_else(|| VaultError::record_not_found(id.to_string()))?
        };
        self.save()?;
        Ok(removed)
    }
}
