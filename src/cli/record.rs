//! Record CLI commands
//!
//! Implements CLI commands for vault record management. Every command except
//! `delete` unlocks a session first.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_record_details, format_record_list};
use crate::error::{VaultError, VaultResult};
use crate::generator::generate;
use crate::models::{RecordField, RecordFields};
use crate::services::VaultService;
use crate::session::VaultSession;
use crate::storage::Storage;

use super::prompt::{prompt_secret, unlock};

/// Record subcommands
#[derive(Subcommand)]
pub enum RecordCommands {
    /// Add a new record
    Add {
        /// Record title
        title: String,
        /// Username or email for the site
        #[arg(short, long)]
        username: String,
        /// Site URL
        #[arg(long)]
        url: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Generate the password instead of prompting for it
        #[arg(short, long)]
        generate: bool,
    },
    /// List records
    List {
        /// Only show records whose title or username contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a record
    Show {
        /// Record ID (or unique prefix)
        record: String,
        /// Print the password instead of masking it
        #[arg(short, long)]
        reveal: bool,
        /// Print only this field's value
        #[arg(short, long)]
        field: Option<RecordField>,
    },
    /// Change one field of a record
    Edit {
        /// Record ID (or unique prefix)
        record: String,
        /// Field to change (title, username, password, url, notes)
        field: RecordField,
        /// New value; omit for password to be prompted
        value: Option<String>,
        /// Remove an optional field
        #[arg(long, conflicts_with_all = ["value", "generate"])]
        clear: bool,
        /// Generate a new value
        #[arg(short, long, conflicts_with = "value")]
        generate: bool,
    },
    /// Delete a record
    Delete {
        /// Record ID (or unique prefix)
        record: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a record command
pub fn handle_record_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RecordCommands,
) -> VaultResult<()> {
    if !storage.is_initialized() {
        return Err(VaultError::account_not_found("run `vault init` first"));
    }

    // Deleting needs no key
    let session = match cmd {
        RecordCommands::Delete { .. } => VaultSession::new(),
        _ => unlock(storage)?,
    };

    let mut service = VaultService::new(&storage.records, &session);
    if settings.audit_enabled {
        service = service.with_audit(storage.audit());
    }

    match cmd {
        RecordCommands::Add {
            title,
            username,
            url,
            notes,
            generate: generate_password,
        } => {
            let password = if generate_password {
                generate(&settings.generator)?
            } else {
                prompt_secret("Record password: ")?.as_str().to_string()
            };

            let mut fields = RecordFields::new(title, username, password);
            if let Some(url) = url {
                fields = fields.with_url(url);
            }
            if let Some(notes) = notes {
                fields = fields.with_notes(notes);
            }

            let record = service.add(&fields)?;
            println!("Added record: {} ({})", fields.title, record.id);
            if generate_password {
                println!("Run 'vault show {} --reveal' to see the password.", record.id);
            }
        }

        RecordCommands::List { search } => {
            let summaries = service.list(search.as_deref())?;
            println!("{}", format_record_list(&summaries));
        }

        RecordCommands::Show {
            record,
            reveal,
            field,
        } => {
            let record = service.find(&record)?;

            match field {
                Some(field) => {
                    let value = service.reveal_field(record.id, field)?.ok_or_else(|| {
                        VaultError::NotFound {
                            entity_type: "Field",
                            identifier: format!("{} on record {}", field, record.id),
                        }
                    })?;
                    println!("{}", value);
                }
                None => {
                    let fields = service.reveal(record.id)?;
                    print!("{}", format_record_details(&record, &fields, reveal));
                }
            }
        }

        RecordCommands::Edit {
            record,
            field,
            value,
            clear,
            generate: generate_value,
        } => {
            let record = service.find(&record)?;

            let value = if clear {
                None
            } else if generate_value {
                Some(generate(&settings.generator)?)
            } else if let Some(value) = value {
                Some(value)
            } else if field == RecordField::Password {
                Some(prompt_secret("New password: ")?.as_str().to_string())
            } else {
                return Err(VaultError::InvalidInput(format!(
                    "A value for '{}' is required (or use --clear)",
                    field
                )));
            };

            let updated = service.update_field(record.id, field, value.as_deref())?;
            if clear {
                println!("Cleared {} on {}", field, updated.id);
            } else {
                println!("Updated {} on {}", field, updated.id);
            }
        }

        RecordCommands::Delete { record, force } => {
            let record = service.find(&record)?;

            if !force {
                println!("About to delete record: {}", record.id);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(record.id)?;
            println!("Deleted record: {}", deleted.id);
        }
    }

    Ok(())
}
