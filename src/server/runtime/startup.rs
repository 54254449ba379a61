use std::process::ExitCode;

use anyhow::Error;
use rmcp::ServiceExt;
use serde_json::json;

use crate::{
    cli::LaunchProfile,
    lib::{
        errors::{ConfigError, CONFIG_INVALID_ERROR},
        telemetry::{self, RuntimeModeTelemetry},
    },
    server::{
        config::ServerConfig,
        runtime::{build_instructions, ConfluenceServer},
    },
    tools::registry::TOOL_NAMES,
};

/// `EX_CONFIG` from sysexits.h.
pub const CONFIG_EXIT_CODE: u8 = 78;

/// Bundles a runtime error message with an exit code and optional structured error data.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
    error_data: Option<rmcp::model::ErrorData>,
}

impl RuntimeExit {
    pub fn structured(error: rmcp::model::ErrorData, exit_code: ExitCode) -> Self {
        Self {
            message: error.message.to_string(),
            exit_code,
            error_data: Some(error),
        }
    }

    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            exit_code: ExitCode::FAILURE,
            error_data: None,
        }
    }

    /// Startup-fatal configuration problem, reported as structured JSON.
    pub fn from_config_error(err: ConfigError) -> Self {
        let built = CONFIG_INVALID_ERROR
            .builder()
            .retryable(false)
            .details(json!({ "field": err.field(), "reason": err.to_string() }))
            .with_exit_code_value(CONFIG_EXIT_CODE)
            .build();
        match built {
            Ok(data) => Self::structured(data, ExitCode::from(CONFIG_EXIT_CODE)),
            Err(_) => Self {
                message: err.to_string(),
                exit_code: ExitCode::from(CONFIG_EXIT_CODE),
                error_data: None,
            },
        }
    }

    pub fn report(self) -> ExitCode {
        if let Some(data) = self.error_data {
            if let Ok(serialized) = serde_json::to_string(&data) {
                eprintln!("{serialized}");
            } else {
                eprintln!("{}", data.message);
            }
        } else {
            eprintln!("{}", self.message);
        }
        self.exit_code
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    pub fn error_data(&self) -> Option<&rmcp::model::ErrorData> {
        self.error_data.as_ref()
    }
}

/// Start the MCP server on stdio and serve until the client closes the stream.
pub async fn run_server(profile: LaunchProfile, config: ServerConfig) -> Result<(), RuntimeExit> {
    let instructions = build_instructions(&config);
    let server =
        ConfluenceServer::new(&config, instructions.clone()).map_err(RuntimeExit::from_error)?;

    telemetry::emit_runtime_mode(&RuntimeModeTelemetry {
        transport: "stdio",
        base_url: config.atlassian.base_url.as_str(),
        config_source: &config.source.to_string(),
        tool_count: TOOL_NAMES.len(),
        instructions: &instructions,
        launch_args: &profile.launch_args,
    });

    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(RuntimeExit::from_error)?;
    running.waiting().await.map_err(RuntimeExit::from_error)?;
    tracing::info!(target: "confluence_mcp::runtime", "MCP client closed the session");
    Ok(())
}
