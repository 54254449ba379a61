//! Project, status and assignable-user listings.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::search::default_number_of_results;
use crate::{
    lib::errors::RemoteError,
    tools::{
        arguments::{require_positive, require_text, ArgumentError, ToolArguments},
        client::{ApiRoot, AtlassianClient},
    },
};

/// Input for `list_projects` and `get_all_statuses`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListingRequest {
    /// Maximum number of entries to request.
    #[serde(default = "default_number_of_results")]
    pub number_of_results: u32,
}

impl ToolArguments for ListingRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_positive("number_of_results", self.number_of_results)
    }
}

/// Input for `query_assignable`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryAssignableRequest {
    /// Project key whose assignable users are listed.
    pub project_key: String,
}

impl ToolArguments for QueryAssignableRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("project_key", &self.project_key)
    }
}

pub async fn list_projects(
    client: &AtlassianClient,
    request: &ListingRequest,
) -> Result<Value, RemoteError> {
    client
        .get(
            ApiRoot::Jira,
            &["project"],
            &[("maxResults", request.number_of_results.to_string())],
        )
        .await
}

pub async fn get_all_statuses(
    client: &AtlassianClient,
    request: &ListingRequest,
) -> Result<Value, RemoteError> {
    client
        .get(
            ApiRoot::Jira,
            &["status"],
            &[("maxResults", request.number_of_results.to_string())],
        )
        .await
}

pub async fn query_assignable(
    client: &AtlassianClient,
    request: &QueryAssignableRequest,
) -> Result<Value, RemoteError> {
    client
        .get(
            ApiRoot::Jira,
            &["user", "assignable", "search"],
            &[("project", request.project_key.clone())],
        )
        .await
}
