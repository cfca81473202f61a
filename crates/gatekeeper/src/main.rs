//! Gatekeeper CLI binary.
//!
//! This binary provides command-line access to the gatekeeper:
//! - Run guarded cycles on a schedule or once
//! - Inspect the capability matrix and check drafts against the safety policy
//! - Seed, list, and clear platform sessions

use clap::Parser;
use gatekeeper::GatekeeperConfig;
use gatekeeper::telemetry::init_telemetry;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, check_draft, handle_session_command, run_forever, run_once,
        show_capabilities,
    };

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    init_telemetry(cli.verbose, cli.json_logs)?;

    let config = GatekeeperConfig::load_with(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Run => run_forever(&config).await?,

        Commands::Once { platform } => run_once(&config, platform).await?,

        Commands::Capabilities => show_capabilities(&config)?,

        Commands::Sessions(cmd) => handle_session_command(&config, cmd).await?,

        Commands::CheckDraft {
            platform,
            text,
            urls,
        } => check_draft(&config, platform, text, urls)?,
    }

    Ok(())
}
