//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod config;
pub mod generate;
pub mod prompt;
pub mod record;

pub use account::{handle_init, handle_status};
pub use config::{handle_config_command, ConfigCommands};
pub use generate::{handle_generate, GenerateArgs};
pub use prompt::MASTER_PASSWORD_ENV;
pub use record::{handle_record_command, RecordCommands};
