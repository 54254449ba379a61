//! Entry point for Confluence MCP.
use std::process::ExitCode;

use clap::Parser;
use confluence_mcp::{
    cli::{execute_cli_command, CliCommand, LaunchProfile, LaunchProfileArgs, ParsedCommand},
    lib::{errors::ConfigError, telemetry},
    server::{
        config::ServerConfig,
        runtime::{self, RuntimeExit},
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = LaunchProfileArgs::parse();
    let command = args.into_command().map_err(RuntimeExit::from_error)?;

    match command {
        ParsedCommand::RunServer(profile) => run_server(profile).await,
        ParsedCommand::Cli(command, profile) => handle_cli_command(command, &profile),
    }
}

async fn run_server(profile: LaunchProfile) -> Result<(), RuntimeExit> {
    let config =
        ServerConfig::load(profile.config_path.clone()).map_err(RuntimeExit::from_config_error)?;
    runtime::run_server(profile, config).await
}

fn handle_cli_command(command: CliCommand, profile: &LaunchProfile) -> Result<(), RuntimeExit> {
    let message = execute_cli_command(command, profile).map_err(|err| {
        match err.downcast::<ConfigError>() {
            Ok(config_err) => RuntimeExit::from_config_error(config_err),
            Err(other) => RuntimeExit::from_error(other),
        }
    })?;
    println!("{message}");
    Ok(())
}
