//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::{build_launch_args, resolve_config_path, LaunchProfile};

/// Parsed command intent from CLI.
#[derive(Debug, Clone)]
pub enum ParsedCommand {
    RunServer(LaunchProfile),
    Cli(CliCommand, LaunchProfile),
}

/// Top-level optional CLI commands.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Print the registered tool descriptors as JSON.
    #[command(about = "Print the registered tool descriptors as JSON")]
    Tools,
    /// Load and validate configuration, then print a redacted summary.
    #[command(about = "Validate configuration and print a redacted summary")]
    CheckConfig,
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Confluence MCP (Confluence and Jira tools over stdio)",
    long_about = None
)]
pub struct LaunchProfileArgs {
    /// Path to a TOML config file (overrides MCP_CONFIG_PATH).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
    /// Optional CLI command mode.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl LaunchProfileArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile> {
        let config_path = resolve_config_path(self.config_override)?;
        let launch_args = build_launch_args(config_path.as_deref());

        Ok(LaunchProfile {
            config_path,
            launch_args,
        })
    }

    /// Parse CLI args into either server launch mode or utility command mode.
    pub fn into_command(mut self) -> Result<ParsedCommand> {
        match self.command.take() {
            Some(command) => Ok(ParsedCommand::Cli(command, self.build()?)),
            None => Ok(ParsedCommand::RunServer(self.build()?)),
        }
    }
}
