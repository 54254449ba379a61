use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    lib::errors::RemoteError,
    tools::{
        arguments::{require_positive, require_text, ArgumentError, ToolArguments},
        client::{ApiRoot, AtlassianClient},
    },
};

pub const DEFAULT_NUMBER_OF_RESULTS: u32 = 1;
pub const SUMMARY_FIELDS: &str = "summary,description";

pub(crate) fn default_number_of_results() -> u32 {
    DEFAULT_NUMBER_OF_RESULTS
}

/// Input for `execute_jql` and `get_only_ticket_name_and_description`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JqlSearchRequest {
    /// JQL query, e.g. `project = DEV AND status = "In Progress"`.
    pub jql: String,
    /// Maximum number of issues to return.
    #[serde(default = "default_number_of_results")]
    pub number_of_results: u32,
}

impl ToolArguments for JqlSearchRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("jql", &self.jql)?;
        require_positive("number_of_results", self.number_of_results)
    }
}

pub async fn execute_jql(
    client: &AtlassianClient,
    request: &JqlSearchRequest,
) -> Result<Value, RemoteError> {
    client
        .get(
            ApiRoot::Jira,
            &["search"],
            &[
                ("jql", request.jql.clone()),
                ("maxResults", request.number_of_results.to_string()),
            ],
        )
        .await
}

/// Same search restricted to `summary` and `description`.
pub async fn get_only_ticket_name_and_description(
    client: &AtlassianClient,
    request: &JqlSearchRequest,
) -> Result<Value, RemoteError> {
    client
        .get(
            ApiRoot::Jira,
            &["search"],
            &[
                ("jql", request.jql.clone()),
                ("maxResults", request.number_of_results.to_string()),
                ("fields", SUMMARY_FIELDS.to_string()),
            ],
        )
        .await
}
