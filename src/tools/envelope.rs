//! Uniform `{content: [{type: "text", text}]}` response envelope.
use rmcp::model::{CallToolResult, Content, ErrorData};
use serde_json::Value;
use tracing::warn;

use crate::lib::{
    errors::RemoteError,
    telemetry::{ToolCallOutcome, ToolCallSpan},
};

/// Wrap `value` as a single pretty-printed text item.
pub fn text_result(value: &Value) -> Result<CallToolResult, ErrorData> {
    let text = serde_json::to_string_pretty(value).map_err(|err| {
        ErrorData::internal_error(format!("failed to serialize tool result: {err}"), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Finish a tool call. Remote failures are folded into an `{error: ...}` payload.
pub fn complete(
    span: ToolCallSpan,
    outcome: Result<Value, RemoteError>,
) -> Result<CallToolResult, ErrorData> {
    let payload = match outcome {
        Ok(value) => {
            span.finish(ToolCallOutcome::Ok);
            value
        }
        Err(err) => {
            warn!(
                target: "confluence_mcp::tools",
                call_id = %span.call_id(),
                error = %err,
                "Remote call failed; returning error payload"
            );
            span.finish(ToolCallOutcome::RemoteError);
            err.into_payload()
        }
    };
    text_result(&payload)
}
