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

pub const DEFAULT_CQL_LIMIT: u32 = 10;

/// Input for `execute_cql_search`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteCqlSearchRequest {
    /// CQL query, e.g. `type=page AND space=DEV AND text ~ "release"`.
    pub cql: String,
    /// Maximum number of results to return.
    #[serde(default = "default_cql_limit")]
    pub limit: u32,
}

fn default_cql_limit() -> u32 {
    DEFAULT_CQL_LIMIT
}

impl ToolArguments for ExecuteCqlSearchRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("cql", &self.cql)?;
        require_positive("limit", self.limit)
    }
}

/// `GET content/search?cql=..&limit=..`
pub async fn execute_cql_search(
    client: &AtlassianClient,
    request: &ExecuteCqlSearchRequest,
) -> Result<Value, RemoteError> {
    client
        .get(
            ApiRoot::Confluence,
            &["content", "search"],
            &[
                ("cql", request.cql.clone()),
                ("limit", request.limit.to_string()),
            ],
        )
        .await
}
