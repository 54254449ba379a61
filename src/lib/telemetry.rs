//! Telemetry initialization and tool-call span helpers.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
///
/// Logs always go to stderr; stdout carries the MCP protocol stream.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// How a tool call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallOutcome {
    Ok,
    RemoteError,
    InvalidArgument,
}

impl ToolCallOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ToolCallOutcome::Ok => "ok",
            ToolCallOutcome::RemoteError => "remote_error",
            ToolCallOutcome::InvalidArgument => "invalid_argument",
        }
    }
}

/// Span helper to record start and finish of a single tool call.
pub struct ToolCallSpan {
    span: Span,
    started_at: Instant,
    call_id: Uuid,
    tool: &'static str,
}

impl ToolCallSpan {
    pub fn start(tool: &'static str) -> Self {
        let call_id = Uuid::new_v4();
        let span = info_span!(
            target: "confluence_mcp::tools",
            "tool_call",
            %call_id,
            tool
        );
        Self {
            span,
            started_at: Instant::now(),
            call_id,
            tool,
        }
    }

    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    /// Close the span while recording outcome and elapsed time.
    pub fn finish(self, outcome: ToolCallOutcome) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "confluence_mcp::tools",
            call_id = %self.call_id,
            tool = self.tool,
            outcome = outcome.as_str(),
            elapsed_ms = elapsed_ms,
            "Completed tool call"
        );
    }
}

/// Payload for logging MCP runtime state as structured telemetry.
#[derive(Debug, Serialize)]
pub struct RuntimeModeTelemetry<'a> {
    pub transport: &'a str,
    pub base_url: &'a str,
    pub config_source: &'a str,
    pub tool_count: usize,
    pub instructions: &'a str,
    pub launch_args: &'a [String],
}

/// Emit runtime mode to `tracing`.
pub fn emit_runtime_mode(telemetry: &RuntimeModeTelemetry<'_>) {
    info!(
        target: "confluence_mcp::runtime",
        transport = telemetry.transport,
        base_url = telemetry.base_url,
        config_source = telemetry.config_source,
        tool_count = telemetry.tool_count,
        instructions = telemetry.instructions,
        launch_args = ?telemetry.launch_args,
        "Started MCP server"
    );
}
