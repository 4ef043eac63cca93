//! Vault service
//!
//! Record operations on top of the record store. Every value written to the
//! store is sealed with the session key first; every value read back is
//! opened with it.

use chrono::{DateTime, Utc};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::crypto::MasterKey;
use crate::error::{VaultError, VaultResult};
use crate::models::{EncryptedRecord, RecordField, RecordFields, RecordId};
use crate::session::VaultSession;
use crate::storage::RecordStore;

/// A record as shown in listings
///
/// `title` and `username` are `None` when that field cannot be decrypted
/// with the session key. Both are mandatory, so `None` never means empty.
#[derive(Debug, Clone)]
pub struct RecordSummary {
    pub id: RecordId,
    pub title: Option<String>,
    pub username: Option<String>,
    pub fields: Vec<RecordField>,
    pub updated_at: DateTime<Utc>,
}

impl RecordSummary {
    /// Whether every listed field decrypted
    pub fn is_readable(&self) -> bool {
        self.title.is_some() && self.username.is_some()
    }

    fn matches(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        [&self.title, &self.username]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&filter))
    }
}

/// Service for vault record management
pub struct VaultService<'a> {
    store: &'a dyn RecordStore,
    session: &'a VaultSession,
    audit: Option<&'a AuditLogger>,
}

impl<'a> VaultService<'a> {
    /// Create a new vault service
    pub fn new(store: &'a dyn RecordStore, session: &'a VaultSession) -> Self {
        Self {
            store,
            session,
            audit: None,
        }
    }

    /// Append record changes to the audit log
    pub fn with_audit(mut self, logger: &'a AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    fn key(&self) -> VaultResult<&MasterKey> {
        self.session.key()
    }

    /// Append to the audit log after the store change has been committed
    ///
    /// A failed write is reported but does not fail the operation.
    fn log(&self, entry: AuditEntry) {
        if let Some(audit) = self.audit {
            if let Err(e) = audit.log(&entry) {
                tracing::warn!(
                    entity = %entry.entity_id,
                    operation = %entry.operation,
                    error = %e,
                    "failed to write audit entry"
                );
            }
        }
    }

    /// Encrypt and store a new record
    pub fn add(&self, fields: &RecordFields) -> VaultResult<EncryptedRecord> {
        let record = EncryptedRecord::seal(fields, self.key()?)?;
        self.store.insert(&record)?;

        self.log(AuditEntry::create(
            EntityType::Record,
            record.id.to_string(),
            record.present_fields(),
        ));
        tracing::debug!(record = %record.id, "record added");

        Ok(record)
    }

    /// Summaries of all records, newest first
    ///
    /// With a filter, only readable records whose title or username contains
    /// it (case-insensitively) are returned.
    pub fn list(&self, filter: Option<&str>) -> VaultResult<Vec<RecordSummary>> {
        let key = self.key()?;

        let summaries = self
            .store
            .list()?
            .iter()
            .map(|record| summarize(record, key))
            .filter(|summary| filter.map_or(true, |f| summary.matches(f)))
            .collect();

        Ok(summaries)
    }

    /// Look up a record by full ID, short ID or ID prefix
    pub fn find(&self, query: &str) -> VaultResult<EncryptedRecord> {
        let mut matches: Vec<EncryptedRecord> = self
            .store
            .list()?
            .into_iter()
            .filter(|record| record.id.matches(query))
            .collect();

        match matches.len() {
            0 => Err(VaultError::record_not_found(query)),
            1 => Ok(matches.remove(0)),
            n => Err(VaultError::InvalidInput(format!(
                "'{}' matches {} records; use a longer ID",
                query, n
            ))),
        }
    }

    fn get(&self, id: RecordId) -> VaultResult<EncryptedRecord> {
        self.store
            .get(id)?
            .ok_or_else(|| VaultError::record_not_found(id.to_string()))
    }

    /// Decrypt every field of a record
    pub fn reveal(&self, id: RecordId) -> VaultResult<RecordFields> {
        let key = self.key()?;
        self.get(id)?.open(key)
    }

    /// Decrypt a single field; `None` if the record has no value for it
    pub fn reveal_field(&self, id: RecordId, field: RecordField) -> VaultResult<Option<String>> {
        let key = self.key()?;
        self.get(id)?.open_field(field, key)
    }

    /// Replace (or clear) one field under a fresh nonce
    pub fn update_field(
        &self,
        id: RecordId,
        field: RecordField,
        value: Option<&str>,
    ) -> VaultResult<EncryptedRecord> {
        let key = self.key()?;
        let mut record = self.get(id)?;

        record.set_field(field, value, key)?;
        self.store.update(&record)?;

        self.log(AuditEntry::update(
            EntityType::Record,
            record.id.to_string(),
            vec![field],
        ));
        tracing::debug!(record = %record.id, field = field.name(), "record updated");

        Ok(record)
    }

    /// Remove a record
    ///
    /// Works while locked: deleting needs no key.
    pub fn delete(&self, id: RecordId) -> VaultResult<EncryptedRecord> {
        let record = self.store.delete(id)?;

        self.log(AuditEntry::delete(EntityType::Record, record.id.to_string()));
        tracing::debug!(record = %record.id, "record deleted");

        Ok(record)
    }
}

fn summarize(record: &EncryptedRecord, key: &MasterKey) -> RecordSummary {
    let open = |field: RecordField| match record.open_field(field, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(record = %record.id, field = %field, error = %e, "cannot decrypt");
            None
        }
    };

    let title = open(RecordField::Title);
    let username = open(RecordField::Username);

    RecordSummary {
        id: record.id,
        title,
        username,
        fields: record.present_fields(),
        updated_at: record.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::test_key;
    use crate::crypto::DerivationSalt;
    use crate::storage::RecordRepository;
    use tempfile::TempDir;

    struct Fixture {
        repo: RecordRepository,
        session: VaultSession,
        logger: AuditLogger,
        _temp: TempDir,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let mut session = VaultSession::new();
        session.install(test_key("pw"), DerivationSalt::generate());

        Fixture {
            repo: RecordRepository::new(temp.path().join("records.json")),
            session,
            logger: AuditLogger::new(temp.path().join("audit.log")),
            _temp: temp,
        }
    }

    impl Fixture {
        fn service(&self) -> VaultService<'_> {
            VaultService::new(&self.repo, &self.session).with_audit(&self.logger)
        }
    }

    #[test]
    fn test_add_and_reveal() {
        let fx = fixture();
        let service = fx.service();

        let fields = RecordFields::new("GitHub", "octocat", "hunter2").with_url("https://github.com");
        let record = service.add(&fields).unwrap();

        assert_eq!(service.reveal(record.id).unwrap(), fields);
        assert_eq!(
            service.reveal_field(record.id, RecordField::Password).unwrap(),
            Some("hunter2".to_string())
        );
        assert_eq!(service.reveal_field(record.id, RecordField::Notes).unwrap(), None);
    }

    #[test]
    fn test_list_and_filter() {
        let fx = fixture();
        let service = fx.service();

        service.add(&RecordFields::new("GitHub", "octocat", "a")).unwrap();
        service.add(&RecordFields::new("Bank", "alice", "b")).unwrap();

        assert_eq!(service.list(None).unwrap().len(), 2);

        let filtered = service.list(Some("git")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title.as_deref(), Some("GitHub"));

        let by_username = service.list(Some("ALICE")).unwrap();
        assert_eq!(by_username.len(), 1);
        assert_eq!(by_username[0].title.as_deref(), Some("Bank"));
    }

    #[test]
    fn test_list_flags_undecryptable_records() {
        let fx = fixture();
        let foreign = EncryptedRecord::seal(&RecordFields::new("Other", "x", "y"), &test_key("other"))
            .unwrap();
        fx.repo.insert(&foreign).unwrap();

        let service = fx.service();
        service.add(&RecordFields::new("Mine", "me", "pw")).unwrap();

        let summaries = service.list(None).unwrap();
        assert_eq!(summaries.len(), 2);

        let unreadable = summaries.iter().find(|s| s.id == foreign.id).unwrap();
        assert!(!unreadable.is_readable());
        assert!(unreadable.username.is_none());

        assert!(service.reveal(foreign.id).unwrap_err().is_authentication_failure());
    }

    #[test]
    fn test_list_flags_unreadable_username() {
        let fx = fixture();
        let service = fx.service();
        let mut record = service.add(&RecordFields::new("GitHub", "octocat", "pw")).unwrap();

        let foreign = EncryptedRecord::seal(&RecordFields::new("x", "y", "z"), &test_key("other"))
            .unwrap();
        record.username = foreign.username.clone();
        fx.repo.update(&record).unwrap();

        let summaries = service.list(None).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title.as_deref(), Some("GitHub"));
        assert!(summaries[0].username.is_none());
        assert!(!summaries[0].is_readable());

        let output = crate::display::format_record_list(&summaries);
        assert!(output.contains("(cannot decrypt)"));
        assert!(output.contains("(1 cannot be decrypted)"));
    }

    #[test]
    fn test_audit_failure_does_not_fail_committed_change() {
        let temp = TempDir::new().unwrap();
        let audit_path = temp.path().join("audit.log");
        std::fs::create_dir(&audit_path).unwrap();

        let mut session = VaultSession::new();
        session.install(test_key("pw"), DerivationSalt::generate());
        let repo = RecordRepository::new(temp.path().join("records.json"));
        let logger = AuditLogger::new(audit_path);
        let service = VaultService::new(&repo, &session).with_audit(&logger);

        let record = service.add(&RecordFields::new("GitHub", "octocat", "pw")).unwrap();
        assert_eq!(repo.count().unwrap(), 1);

        service
            .update_field(record.id, RecordField::Password, Some("new"))
            .unwrap();
        assert_eq!(service.reveal(record.id).unwrap().password, "new");

        service.delete(record.id).unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_update_field() {
        let fx = fixture();
        let service = fx.service();
        let record = service
            .add(&RecordFields::new("GitHub", "octocat", "old").with_notes("note"))
            .unwrap();

        let updated = service
            .update_field(record.id, RecordField::Password, Some("new"))
            .unwrap();
        assert_ne!(updated.password, record.password);
        assert_eq!(updated.title, record.title);

        service.update_field(record.id, RecordField::Notes, None).unwrap();

        let fields = service.reveal(record.id).unwrap();
        assert_eq!(fields.password, "new");
        assert_eq!(fields.notes, None);
    }

    #[test]
    fn test_cannot_clear_mandatory_field() {
        let fx = fixture();
        let service = fx.service();
        let record = service.add(&RecordFields::new("GitHub", "octocat", "pw")).unwrap();

        let result = service.update_field(record.id, RecordField::Username, None);
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
        assert_eq!(service.reveal(record.id).unwrap().username, "octocat");
    }

    #[test]
    fn test_delete() {
        let fx = fixture();
        let service = fx.service();
        let record = service.add(&RecordFields::new("GitHub", "octocat", "pw")).unwrap();

        service.delete(record.id).unwrap();
        assert!(service.list(None).unwrap().is_empty());
        assert!(service.delete(record.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_by_prefix() {
        let fx = fixture();
        let service = fx.service();
        let record = service.add(&RecordFields::new("GitHub", "octocat", "pw")).unwrap();

        assert_eq!(service.find(&record.id.to_string()).unwrap().id, record.id);
        assert_eq!(
            service.find(&record.id.as_uuid().to_string()).unwrap().id,
            record.id
        );
        assert!(service.find("rec-zzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_locked_session() {
        let temp = TempDir::new().unwrap();
        let repo = RecordRepository::new(temp.path().join("records.json"));
        let session = VaultSession::new();
        let service = VaultService::new(&repo, &session);

        let result = service.add(&RecordFields::new("GitHub", "octocat", "pw"));
        assert!(matches!(result, Err(VaultError::Locked)));
        assert!(matches!(service.list(None), Err(VaultError::Locked)));
    }

    #[test]
    fn test_audit_entries_have_no_values() {
        let fx = fixture();
        let service = fx.service();
        let record = service
            .add(&RecordFields::new("GitHub", "octocat", "supersecret"))
            .unwrap();
        service
            .update_field(record.id, RecordField::Password, Some("evenmoresecret"))
            .unwrap();
        service.delete(record.id).unwrap();

        let entries = fx.logger.read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].fields,
            vec![RecordField::Title, RecordField::Username, RecordField::Password]
        );
        assert_eq!(entries[1].fields, vec![RecordField::Password]);

        let raw = std::fs::read_to_string(fx.logger.path()).unwrap();
        assert!(!raw.contains("supersecret"));
        assert!(!raw.contains("octocat"));
        assert!(!raw.contains(&record.password.ciphertext));
    }
}
