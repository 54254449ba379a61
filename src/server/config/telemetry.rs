use tracing::{debug, info};

use super::{ConfigSource, ServerConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_source(source: &ConfigSource) {
    match source {
        ConfigSource::File(path) => info!(
            target: "confluence_mcp::config",
            path = %path.display(),
            "Loading configuration file with CONFLUENCE_* environment overrides"
        ),
        ConfigSource::Environment => debug!(
            target: "confluence_mcp::config",
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "No configuration file found; reading CONFLUENCE_* environment variables only"
        ),
    }
}

pub fn log_loaded(config: &ServerConfig) {
    info!(
        target: "confluence_mcp::config",
        source = %config.source,
        base_url = %config.atlassian.base_url,
        confluence_api_path = %config.atlassian.confluence_api_path,
        jira_api_path = %config.atlassian.jira_api_path,
        timeout_secs = ?config.atlassian.timeout_secs,
        "Configuration loaded successfully"
    );
    debug!(
        target: "confluence_mcp::config",
        email = %config.atlassian.email,
        "Using basic-auth account"
    );
}
