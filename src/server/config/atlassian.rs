use std::fmt;

use reqwest::Url;
use serde::Deserialize;

use super::ConfigSource;
use crate::lib::errors::ConfigError;

pub const DEFAULT_CONFLUENCE_API_PATH: &str = "/wiki/rest/api";
pub const DEFAULT_JIRA_API_PATH: &str = "/rest/api/2";
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Site URL and static credentials for the Atlassian instance.
#[derive(Clone)]
pub struct AtlassianConfig {
    pub base_url: Url,
    pub email: String,
    pub api_token: String,
    pub confluence_api_path: String,
    pub jira_api_path: String,
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for AtlassianConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtlassianConfig")
            .field("base_url", &self.base_url.as_str())
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("confluence_api_path", &self.confluence_api_path)
            .field("jira_api_path", &self.jira_api_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawAtlassianSection {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub confluence_api_path: Option<String>,
    pub jira_api_path: Option<String>,
    pub timeout_secs: Option<u64>,
}

pub fn parse_atlassian_section(
    raw: Option<RawAtlassianSection>,
    source: &ConfigSource,
) -> Result<AtlassianConfig, ConfigError> {
    let raw = raw.unwrap_or_default();

    let base_url = required(raw.base_url, source, "atlassian.base_url")?;
    let base_url = validate_base_url(source, &base_url)?;
    let email = required(raw.email, source, "atlassian.email")?;
    let api_token = required(raw.api_token, source, "atlassian.api_token")?;

    let confluence_api_path = raw
        .confluence_api_path
        .unwrap_or_else(|| DEFAULT_CONFLUENCE_API_PATH.to_string());
    validate_api_path(source, "atlassian.confluence_api_path", &confluence_api_path)?;

    let jira_api_path = raw
        .jira_api_path
        .unwrap_or_else(|| DEFAULT_JIRA_API_PATH.to_string());
    validate_api_path(source, "atlassian.jira_api_path", &jira_api_path)?;

    if let Some(timeout) = raw.timeout_secs {
        validate_timeout(source, timeout)?;
    }

    Ok(AtlassianConfig {
        base_url,
        email,
        api_token,
        confluence_api_path,
        jira_api_path,
        timeout_secs: raw.timeout_secs,
    })
}

fn required(
    value: Option<String>,
    source: &ConfigSource,
    field: &'static str,
) -> Result<String, ConfigError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingField {
            source_label: source.clone(),
            field,
        })
}

fn validate_base_url(source: &ConfigSource, raw: &str) -> Result<Url, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidField {
        source_label: source.clone(),
        field: "atlassian.base_url",
        message,
    };
    let url = Url::parse(raw).map_err(|err| invalid(format!("{raw} is not a URL: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("Only http and https are supported: {raw}")));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid(format!("Provide an absolute site URL: {raw}")));
    }
    Ok(url)
}

fn validate_api_path(
    source: &ConfigSource,
    field: &'static str,
    path: &str,
) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::InvalidField {
            source_label: source.clone(),
            field,
            message: format!("API paths must start with `/`: {path}"),
        });
    }
    Ok(())
}

fn validate_timeout(source: &ConfigSource, timeout: u64) -> Result<(), ConfigError> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&timeout) {
        return Err(ConfigError::InvalidField {
            source_label: source.clone(),
            field: "atlassian.timeout_secs",
            message: format!("Specify a value between 1 and {MAX_TIMEOUT_SECS} seconds"),
        });
    }
    Ok(())
}
