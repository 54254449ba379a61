//! Load and validate server configuration.
use std::{env, fmt, path::PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod atlassian;
pub mod telemetry;

pub use atlassian::{
    parse_atlassian_section, AtlassianConfig, RawAtlassianSection, DEFAULT_CONFLUENCE_API_PATH,
    DEFAULT_JIRA_API_PATH, MAX_TIMEOUT_SECS,
};

pub const CONFIG_ENV_KEY: &str = "MCP_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "confluence-mcp.toml";

/// Environment variables that override keys of the config file.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("atlassian.base_url", "CONFLUENCE_BASE_URL"),
    ("atlassian.email", "CONFLUENCE_EMAIL"),
    ("atlassian.api_token", "CONFLUENCE_API_TOKEN"),
];

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{} (+ environment)", path.display()),
            ConfigSource::Environment => f.write_str("environment"),
        }
    }
}

/// Top-level configuration container.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub atlassian: AtlassianConfig,
    pub source: ConfigSource,
}

#[derive(Debug, Deserialize)]
struct RawServerConfig {
    atlassian: Option<RawAtlassianSection>,
}

impl ServerConfig {
    /// Load from an optional config file, with `CONFLUENCE_*` variables on top.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| env::var(key).ok())
    }

    /// Same as [`ServerConfig::load`] with an injectable environment lookup.
    pub fn load_with_env(
        path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let source = match &path {
            Some(path) => ConfigSource::File(path.clone()),
            None => ConfigSource::Environment,
        };
        telemetry::log_source(&source);

        let mut builder = config::Config::builder();
        if let Some(path) = &path {
            builder = builder.add_source(config::File::from(path.clone()));
        }
        for (key, variable) in ENV_OVERRIDES {
            let value = lookup(variable).filter(|value| !value.trim().is_empty());
            builder = builder
                .set_override_option(*key, value)
                .map_err(|err| ConfigError::from_read_error(source.clone(), err))?;
        }

        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(source.clone(), err);
            error!(
                target: "confluence_mcp::config",
                source = %source,
                reason = %error,
                "Failed to read configuration"
            );
            error
        })?;

        let raw: RawServerConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(source.clone(), err);
            error!(
                target: "confluence_mcp::config",
                source = %source,
                reason = %error,
                "Failed to parse configuration"
            );
            error
        })?;

        let config = Self::from_raw(raw, source.clone()).map_err(|err| {
            error!(
                target: "confluence_mcp::config",
                source = %source,
                reason = %err,
                "Failed to validate configuration"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        info!(
            target: "confluence_mcp::config",
            source = %config.source,
            "Configuration ready"
        );
        Ok(config)
    }

    fn from_raw(raw: RawServerConfig, source: ConfigSource) -> Result<Self, ConfigError> {
        let atlassian = parse_atlassian_section(raw.atlassian, &source)?;
        Ok(Self { atlassian, source })
    }
}
