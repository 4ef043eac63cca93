use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vault_cli::cli::{
    handle_config_command, handle_generate, handle_init, handle_record_command, handle_status,
    ConfigCommands, GenerateArgs, RecordCommands,
};
use vault_cli::config::{paths::DATA_DIR_ENV, KdfAlgorithm, Settings, VaultPaths};
use vault_cli::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "VAULT_LOG";

#[derive(Parser)]
#[command(
    name = "vault",
    version,
    about = "Terminal password vault with client-side encryption",
    long_about = "vault stores website credentials encrypted with AES-256-GCM under a key \
                  derived from your master password. Only ciphertext ever reaches disk."
)]
struct Cli {
    /// Vault directory (defaults to ~/.config/vault-cli)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the vault account
    Init {
        /// Account name, e.g. your email address
        #[arg(short, long, default_value = "default")]
        name: String,
        /// Key derivation algorithm
        #[arg(long, value_enum)]
        kdf: Option<KdfAlgorithm>,
    },

    /// Show account and storage status
    Status,

    #[command(flatten)]
    Record(RecordCommands),

    /// Generate a random password
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => VaultPaths::with_base_dir(dir),
        None => VaultPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths)?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init { name, kdf }) => {
            handle_init(&storage, &mut settings, &name, kdf)?;
        }
        Some(Commands::Status) => handle_status(&storage)?,
        Some(Commands::Record(cmd)) => {
            handle_record_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Generate(args)) => handle_generate(&settings, &args)?,
        Some(Commands::Config { action }) => {
            handle_config_command(&storage, &mut settings, action)?;
        }
        None => {
            println!("vault - terminal password vault");
            println!();
            println!("Run 'vault --help' for usage information.");
            println!("Run 'vault init' to create your vault.");
        }
    }

    Ok(())
}
