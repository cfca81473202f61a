//! Session management command handlers.

use super::{CommandResult, SessionCommands};
use gatekeeper::{ConfigError, GatekeeperConfig, Session};
use serde_json::json;
use tracing::info;

/// Handle session management commands.
pub async fn handle_session_command(
    config: &GatekeeperConfig,
    cmd: SessionCommands,
) -> CommandResult {
    let store = config.session_store()?;

    match cmd {
        SessionCommands::List => {
            for session in store.list().await? {
                let line = json!({
                    "platform": session.platform(),
                    "authenticated": session.is_authenticated(),
                    "created_at": session.created_at(),
                    "last_validated_at": session.last_validated_at(),
                    "credential_bytes": session.credentials().len(),
                });
                println!("{}", line);
            }
        }

        SessionCommands::Clear { platform } => {
            if store.remove(platform).await? {
                info!(platform = %platform, "Session removed");
                println!("Removed session for {}", platform);
            } else {
                println!("No session stored for {}", platform);
            }
        }

        SessionCommands::Seed {
            platform,
            credentials_file,
        } => {
            let credentials = tokio::fs::read(&credentials_file).await?;
            if credentials.is_empty() {
                return Err(ConfigError::new(format!(
                    "Credentials file {} is empty",
                    credentials_file.display()
                ))
                .into());
            }
            store
                .put(platform, &Session::new(platform, credentials))
                .await?;
            info!(platform = %platform, "Session seeded");
            println!("Seeded session for {}", platform);
        }
    }

    Ok(())
}
