//! CLI command definitions.

use clap::{Parser, Subcommand};
use gatekeeper::Platform;
use std::path::PathBuf;

/// Gatekeeper - fail-closed safety wrapper for social platform automation
#[derive(Parser, Debug)]
#[command(name = "gatekeeper")]
#[command(about = "Fail-closed safety wrapper for social platform automation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file applied on top of the defaults
    #[arg(long, global = true, env = "GATEKEEPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run cycles for every enabled platform until Ctrl-C
    Run,

    /// Run a single cycle and print the results as JSON lines
    Once {
        /// Only run this platform
        #[arg(long)]
        platform: Option<Platform>,
    },

    /// Print the effective capability matrix
    Capabilities,

    /// Manual session management
    #[command(subcommand)]
    Sessions(SessionCommands),

    /// Evaluate the content safety policy on a draft
    CheckDraft {
        /// Platform the draft is meant for
        #[arg(long)]
        platform: Platform,

        /// Draft text
        text: String,

        /// URL referenced by the draft (repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// List stored sessions without their credentials
    List,

    /// Delete the stored session for a platform
    Clear {
        /// Platform whose session is removed
        platform: Platform,
    },

    /// Store operator-supplied credentials as an authenticated session
    Seed {
        /// Platform the credentials belong to
        platform: Platform,

        /// File holding the opaque credential blob (cookies or tokens)
        #[arg(long)]
        credentials_file: PathBuf,
    },
}
