//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the gatekeeper binary.

mod check;
mod commands;
mod run;
mod sessions;

pub use check::{check_draft, show_capabilities};
pub use commands::{Cli, Commands, SessionCommands};
pub use run::{run_forever, run_once};
pub use sessions::handle_session_command;

/// Result type for command handlers.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
