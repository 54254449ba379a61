use std::fmt;

use config::ConfigError as ConfigLoaderError;
use rmcp::model::ErrorData;
use serde::Serialize;
use serde_json::{json, Map, Number, Value};
use thiserror::Error;

use crate::server::config::ConfigSource;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration sources.
    #[error("Failed to read configuration from {source_label}: {source}")]
    FileRead {
        source_label: ConfigSource,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize the merged configuration into a struct.
    #[error("Failed to parse configuration from {source_label}: {source}")]
    Parse {
        source_label: ConfigSource,
        #[source]
        source: ConfigLoaderError,
    },
    /// Required field is missing.
    #[error("Configuration from {source_label} is missing `{field}`")]
    MissingField {
        source_label: ConfigSource,
        field: &'static str,
    },
    /// Field failed validation.
    #[error("Configuration from {source_label} has invalid `{field}`: {message}")]
    InvalidField {
        source_label: ConfigSource,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(source_label: ConfigSource, source: ConfigLoaderError) -> Self {
        Self::FileRead {
            source_label,
            source,
        }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(source_label: ConfigSource, source: ConfigLoaderError) -> Self {
        Self::Parse {
            source_label,
            source,
        }
    }

    /// Name of the offending field, when the error points at one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingField { field, .. } | ConfigError::InvalidField { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

/// Failures while constructing the shared HTTP client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Credentials cannot be encoded as an Authorization header")]
    InvalidAuthHeader,
}

/// Failures of a remote Atlassian call. These are handed back to the agent
/// as `{ "error": ... }` payloads instead of protocol errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RemoteError {
    #[error("remote responded with HTTP {status}")]
    Status { status: u16, body: Value },
    #[error("request failed: {message}")]
    Transport { message: String },
    #[error("unexpected remote payload: {message}")]
    UnexpectedPayload { message: String },
}

impl RemoteError {
    pub fn transport(err: impl fmt::Display) -> Self {
        RemoteError::Transport {
            message: err.to_string(),
        }
    }

    /// Body placed under the `error` key: the remote body when there is one,
    /// otherwise the failure message.
    pub fn into_payload(self) -> Value {
        let error = match self {
            RemoteError::Status { body, .. } => body,
            other => Value::String(other.to_string()),
        };
        json!({ "error": error })
    }
}

/// Structured error metadata returned by MCP tools.
#[derive(Debug, Clone, Serialize)]
pub struct ToolErrorDescriptor {
    /// Error code.
    pub code: &'static str,
    /// User-facing message.
    pub message: &'static str,
    /// Recommended remediation.
    pub remediation: &'static str,
}

impl ToolErrorDescriptor {
    pub const fn new(code: &'static str, message: &'static str, remediation: &'static str) -> Self {
        Self {
            code,
            message,
            remediation,
        }
    }

    pub fn builder(&self) -> ToolErrorDescriptorBuilder<'_> {
        ToolErrorDescriptorBuilder::new(self)
    }
}

/// Builder for error data that fails if required fields are missing.
pub struct ToolErrorDescriptorBuilder<'a> {
    descriptor: &'a ToolErrorDescriptor,
    retryable: Option<bool>,
    details: Option<Value>,
    extra_fields: Map<String, Value>,
}

impl<'a> ToolErrorDescriptorBuilder<'a> {
    pub fn new(descriptor: &'a ToolErrorDescriptor) -> Self {
        Self {
            descriptor,
            retryable: None,
            details: None,
            extra_fields: Map::new(),
        }
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_context_field(mut self, key: &str, value: Value) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }

    pub fn with_exit_code_value(mut self, exit_code: u8) -> Self {
        let numeric = Number::from(exit_code);
        self.extra_fields
            .insert("exit_code".into(), Value::Number(numeric));
        self
    }

    pub fn build(self) -> Result<ErrorData, ToolErrorBuilderError> {
        if self.descriptor.remediation.trim().is_empty() {
            return Err(ToolErrorBuilderError::MissingRemediation {
                code: self.descriptor.code,
            });
        }
        let retryable = self
            .retryable
            .ok_or(ToolErrorBuilderError::MissingRetryable {
                code: self.descriptor.code,
            })?;

        let mut data = Map::new();
        data.insert("code".into(), Value::String(self.descriptor.code.into()));
        data.insert(
            "remediation".into(),
            Value::String(self.descriptor.remediation.into()),
        );
        data.insert("retryable".into(), Value::Bool(retryable));
        if let Some(details) = self.details {
            data.insert("details".into(), details);
        }
        for (key, value) in self.extra_fields {
            data.insert(key, value);
        }

        Ok(ErrorData::invalid_params(
            self.descriptor.message,
            Some(Value::Object(data)),
        ))
    }
}

/// Errors when required builder fields are missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolErrorBuilderError {
    #[error("retryable is missing (code={code})")]
    MissingRetryable { code: &'static str },
    #[error("remediation is empty (code={code})")]
    MissingRemediation { code: &'static str },
}

/// Standard error for rejected tool arguments.
pub const INVALID_ARGUMENT_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "invalid_argument",
    "Tool arguments failed validation",
    "Provide every required argument as a non-empty value and retry.",
);

/// Standard error for unusable startup configuration.
pub const CONFIG_INVALID_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "CONFIG_INVALID",
    "Atlassian configuration is missing or invalid",
    "Set CONFLUENCE_BASE_URL, CONFLUENCE_EMAIL and CONFLUENCE_API_TOKEN (or the [atlassian] section of the config file) and restart.",
);
