//! CLI entrypoint module structure.
use anyhow::Result;
use serde_json::json;

use crate::server::{
    config::ServerConfig,
    runtime::ConfluenceServer,
};

pub mod args;
pub mod profile;

pub use args::{CliCommand, LaunchProfileArgs, ParsedCommand};
pub use profile::{build_launch_args, resolve_config_path, LaunchProfile};

/// Execute CLI command mode and return a user-facing result payload.
pub fn execute_cli_command(command: CliCommand, profile: &LaunchProfile) -> Result<String> {
    match command {
        CliCommand::Tools => render_tool_descriptors(),
        CliCommand::CheckConfig => {
            let config = ServerConfig::load(profile.config_path.clone())?;
            render_config_summary(&config)
        }
    }
}

fn render_tool_descriptors() -> Result<String> {
    Ok(serde_json::to_string_pretty(
        &ConfluenceServer::tool_descriptors(),
    )?)
}

fn render_config_summary(config: &ServerConfig) -> Result<String> {
    let atlassian = &config.atlassian;
    let payload = json!({
        "status": "ok",
        "source": config.source.to_string(),
        "base_url": atlassian.base_url.as_str(),
        "email": atlassian.email,
        "api_token": "<redacted>",
        "confluence_api_path": atlassian.confluence_api_path,
        "jira_api_path": atlassian.jira_api_path,
        "timeout_secs": atlassian.timeout_secs
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}
