//! Record display formatting
//!
//! Formats vault records for terminal output in table and detail views.
//! Passwords are masked unless explicitly revealed.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{EncryptedRecord, RecordField, RecordFields};
use crate::services::RecordSummary;

const MASK: &str = "********";
const UNREADABLE: &str = "(cannot decrypt)";

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Fields")]
    fields: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&RecordSummary> for RecordRow {
    fn from(summary: &RecordSummary) -> Self {
        let fields: Vec<&str> = summary.fields.iter().map(|f| f.name()).collect();

        Self {
            id: summary.id.to_string(),
            title: summary
                .title
                .as_deref()
                .map_or_else(|| UNREADABLE.to_string(), |t| truncate(t, 32)),
            username: summary
                .username
                .as_deref()
                .map_or_else(|| UNREADABLE.to_string(), |u| truncate(u, 24)),
            fields: fields.join(","),
            updated: summary.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Format a list of record summaries as a table
pub fn format_record_list(summaries: &[RecordSummary]) -> String {
    if summaries.is_empty() {
        return "No records found.".to_string();
    }

    let rows: Vec<RecordRow> = summaries.iter().map(RecordRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());

    let unreadable = summaries.iter().filter(|s| !s.is_readable()).count();

    let mut output = table.to_string();
    output.push_str(&format!("\n\nTotal: {} records", summaries.len()));
    if unreadable > 0 {
        output.push_str(&format!(" ({} cannot be decrypted)", unreadable));
    }
    output
}

/// Format a decrypted record
pub fn format_record_details(record: &EncryptedRecord, fields: &RecordFields, reveal: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Record: {}\n", fields.title));
    output.push_str(&format!("  ID:       {}\n", record.id));
    output.push_str(&format!("  Username: {}\n", fields.username));
    output.push_str(&format!(
        "  Password: {}\n",
        if reveal { fields.password.as_str() } else { MASK }
    ));

    if let Some(url) = fields.get(RecordField::Url) {
        output.push_str(&format!("  URL:      {}\n", url));
    }

    if let Some(notes) = fields.get(RecordField::Notes) {
        output.push('\n');
        output.push_str(&format!("  Notes: {}\n", notes));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        record.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

/// Truncate a string to at most `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::test_key;
    use crate::models::RecordId;
    use chrono::Utc;

    fn summary(title: Option<&str>) -> RecordSummary {
        RecordSummary {
            id: RecordId::new(),
            title: title.map(String::from),
            username: title.map(|_| "octocat".to_string()),
            fields: vec![RecordField::Title, RecordField::Username, RecordField::Password],
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_record_list() {
        let output = format_record_list(&[summary(Some("GitHub")), summary(None)]);

        assert!(output.contains("GitHub"));
        assert!(output.contains("octocat"));
        assert!(output.contains(UNREADABLE));
        assert!(output.contains("title,username,password"));
        assert!(output.contains("Total: 2 records (1 cannot be decrypted)"));
    }

    #[test]
    fn test_unreadable_username_is_never_blank() {
        let mut partial = summary(Some("GitHub"));
        partial.username = None;

        let output = format_record_list(&[partial]);
        assert!(output.contains("GitHub"));
        assert!(output.contains(UNREADABLE));
        assert!(output.contains("Total: 1 records (1 cannot be decrypted)"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_record_list(&[]).contains("No records found"));
    }

    #[test]
    fn test_password_masked_unless_revealed() {
        let key = test_key("pw");
        let fields = RecordFields::new("GitHub", "octocat", "hunter2").with_notes("backup codes in safe");
        let record = EncryptedRecord::seal(&fields, &key).unwrap();

        let masked = format_record_details(&record, &fields, false);
        assert!(masked.contains(MASK));
        assert!(!masked.contains("hunter2"));
        assert!(masked.contains("backup codes in safe"));
        assert!(!masked.contains("URL"));

        let revealed = format_record_details(&record, &fields, true);
        assert!(revealed.contains("hunter2"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title indeed", 10), "a very ...");
    }
}
