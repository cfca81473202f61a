//! Read-only policy inspection commands.

use super::CommandResult;
use gatekeeper::{ContentSafetyPolicy, DraftBuilder, GatekeeperConfig, Platform, platforms};
use serde_json::json;

/// Print one JSON line per platform with its effective capabilities.
pub fn show_capabilities(config: &GatekeeperConfig) -> CommandResult {
    let matrix = config.capability_matrix();

    for platform in Platform::all() {
        let adapter = platforms::adapter_for(platform);
        let line = json!({
            "platform": platform,
            "enabled": config.platform(platform).enabled,
            "capabilities": matrix.capabilities(platform),
            "notes": adapter.notes(),
        });
        println!("{}", line);
    }

    Ok(())
}

/// Evaluate a draft against the configured safety policy and print the verdict.
pub fn check_draft(
    config: &GatekeeperConfig,
    platform: Platform,
    text: String,
    urls: Vec<String>,
) -> CommandResult {
    let policy: ContentSafetyPolicy = config.safety_policy()?;
    let draft = DraftBuilder::default()
        .platform(platform)
        .text(text)
        .referenced_urls(urls)
        .build()?;

    let verdict = policy.evaluate(&draft);
    println!("{}", serde_json::to_string(&verdict)?);
    Ok(())
}
