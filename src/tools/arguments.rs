//! Argument decoding and validation shared by every tool.
use rmcp::{
    handler::server::{common::FromContextPart, tool::ToolCallContext},
    model::{ErrorData, JsonObject},
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use crate::lib::errors::INVALID_ARGUMENT_ERROR;

/// Argument problems detected before any remote call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("`{field}` is required and must not be empty")]
    Missing { field: &'static str },
    #[error("`{field}` must not be blank when provided")]
    Blank { field: &'static str },
    #[error("`{field}` must be at least 1 (got {value})")]
    NotPositive { field: &'static str, value: u32 },
    #[error("`{field}` must not contain empty entries")]
    EmptyEntry { field: &'static str },
    #[error("at least one of {fields} must be provided")]
    NothingToUpdate { fields: &'static str },
    #[error("arguments do not match the tool schema: {reason}")]
    Malformed { field: String, reason: String },
}

impl ArgumentError {
    pub fn field(&self) -> &str {
        match self {
            ArgumentError::Missing { field }
            | ArgumentError::Blank { field }
            | ArgumentError::NotPositive { field, .. }
            | ArgumentError::EmptyEntry { field } => field,
            ArgumentError::NothingToUpdate { fields } => fields,
            ArgumentError::Malformed { field, .. } => field,
        }
    }

    /// Wrap a deserialization failure, naming the field when serde reports one.
    pub fn malformed(err: serde_json::Error) -> Self {
        let reason = err.to_string();
        let field = reason
            .split_once("field `")
            .and_then(|(_, rest)| rest.split_once('`'))
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "arguments".to_string());
        ArgumentError::Malformed { field, reason }
    }
}

/// Typed tool arguments decoded from the raw `tools/call` object.
///
/// Unlike rmcp's `Parameters`, decoding failures carry the same
/// `invalid_argument` data as validation failures.
pub struct ToolInput<T>(pub T);

/// Decode a raw argument object into a request struct.
pub fn decode_arguments<T: DeserializeOwned>(arguments: JsonObject) -> Result<T, ArgumentError> {
    serde_json::from_value(Value::Object(arguments)).map_err(ArgumentError::malformed)
}

impl<S, T> FromContextPart<ToolCallContext<'_, S>> for ToolInput<T>
where
    T: DeserializeOwned,
{
    fn from_context_part(context: &mut ToolCallContext<'_, S>) -> Result<Self, ErrorData> {
        let arguments = context.arguments.take().unwrap_or_default();
        decode_arguments(arguments).map(ToolInput).map_err(|err| {
            warn!(
                target: "confluence_mcp::tools",
                tool = context.name(),
                reason = %err,
                "Rejected undecodable tool arguments"
            );
            argument_error_to_error_data(context.name(), err)
        })
    }
}

/// Implemented by every typed tool request.
pub trait ToolArguments {
    fn validate(&self) -> Result<(), ArgumentError>;
}

pub fn require_text(field: &'static str, value: &str) -> Result<(), ArgumentError> {
    if value.trim().is_empty() {
        return Err(ArgumentError::Missing { field });
    }
    Ok(())
}

pub fn optional_text(field: &'static str, value: Option<&str>) -> Result<(), ArgumentError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(ArgumentError::Blank { field }),
        _ => Ok(()),
    }
}

pub fn require_positive(field: &'static str, value: u32) -> Result<(), ArgumentError> {
    if value == 0 {
        return Err(ArgumentError::NotPositive { field, value });
    }
    Ok(())
}

/// Map an [`ArgumentError`] to the `invalid_params` error returned to the client.
pub fn argument_error_to_error_data(tool: &str, err: ArgumentError) -> ErrorData {
    INVALID_ARGUMENT_ERROR
        .builder()
        .retryable(false)
        .details(json!({ "field": err.field(), "reason": err.to_string() }))
        .with_context_field("tool", json!(tool))
        .build()
        .unwrap_or_else(|build_err| {
            ErrorData::invalid_params(
                err.to_string(),
                Some(json!({ "tool": tool, "builder_error": build_err.to_string() })),
            )
        })
}
