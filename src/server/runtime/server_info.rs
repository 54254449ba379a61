use crate::server::config::ServerConfig;

/// Build the `ServerInfo.instructions` string shown to MCP clients.
pub fn build_instructions(config: &ServerConfig) -> String {
    format!(
        "Connected to {base_url} (Confluence API {confluence}, Jira API {jira}; config from {source}). Tool results are pretty-printed JSON; remote failures come back as {{\"error\": ...}} payloads rather than tool errors.",
        base_url = config.atlassian.base_url,
        confluence = config.atlassian.confluence_api_path,
        jira = config.atlassian.jira_api_path,
        source = config.source,
    )
}
