//! Configuration CLI commands
//!
//! Shows paths and settings, changes non-secret preferences, and prints
//! the audit log.

use clap::Subcommand;

use crate::config::{KdfAlgorithm, Settings};
use crate::error::VaultResult;
use crate::generator::{generate, GeneratorOptions};
use crate::storage::Storage;

use super::generate::GenerateArgs;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration and paths
    Show,
    /// Set the key derivation algorithm for new accounts
    Kdf {
        #[arg(value_enum)]
        algorithm: KdfAlgorithm,
    },
    /// Turn the audit log on or off
    Audit {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Set the defaults used by `vault generate` and `--generate`
    ///
    /// Unspecified options fall back to the built-in defaults.
    Generator(GenerateArgs),
    /// Show recent audit log entries
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a config command
pub fn handle_config_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> VaultResult<()> {
    let paths = storage.paths();

    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            println!("vault-cli Configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  KDF for new accounts: {:?}", settings.kdf_algorithm);
            println!("  Audit log enabled:    {}", settings.audit_enabled);

            let g = &settings.generator;
            println!(
                "  Generator: length {}, upper {}, lower {}, digits {}, symbols {}, exclude ambiguous {}",
                g.length,
                g.include_upper,
                g.include_lower,
                g.include_numbers,
                g.include_symbols,
                g.exclude_ambiguous
            );
        }

        ConfigCommands::Kdf { algorithm } => {
            settings.kdf_algorithm = algorithm;
            settings.save(paths)?;
            println!("New accounts will use {:?}", algorithm);
            if storage.is_initialized() {
                println!("The existing account keeps the parameters it was created with.");
            }
        }

        ConfigCommands::Audit { enabled } => {
            settings.audit_enabled = enabled;
            settings.save(paths)?;
            println!(
                "Audit log {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }

        ConfigCommands::Generator(args) => {
            let options = args.options(&GeneratorOptions::default());
            // Refuse options that generate() would reject
            generate(&options)?;
            settings.generator = options;
            settings.save(paths)?;
            println!(
                "Generator defaults saved (~{:.0} bits of entropy)",
                options.entropy_bits()
            );
        }

        ConfigCommands::Log { limit } => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in &entries {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}
