//! Page fetch and version-incremented page update.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    lib::errors::RemoteError,
    tools::{
        arguments::{optional_text, require_text, ArgumentError, ToolArguments},
        client::{ApiRoot, AtlassianClient},
    },
};

pub const PAGE_EXPAND: &str = "body.storage,version";
const UPDATE_LOOKUP_EXPAND: &str = "version,space";

/// Input for `get_page_content`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetPageContentRequest {
    /// Confluence page ID.
    #[serde(rename = "pageId")]
    pub page_id: String,
}

impl ToolArguments for GetPageContentRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("pageId", &self.page_id)
    }
}

/// Input for `update_page_content`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdatePageContentRequest {
    /// Confluence page ID.
    #[serde(rename = "pageId")]
    pub page_id: String,
    /// New page body in Confluence storage format (XHTML).
    pub content: String,
    /// New title. The current title is kept when omitted.
    #[serde(default)]
    pub title: Option<String>,
}

impl ToolArguments for UpdatePageContentRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("pageId", &self.page_id)?;
        require_text("content", &self.content)?;
        optional_text("title", self.title.as_deref())
    }
}

pub async fn get_page_content(
    client: &AtlassianClient,
    request: &GetPageContentRequest,
) -> Result<Value, RemoteError> {
    client
        .get(
            ApiRoot::Confluence,
            &["content", request.page_id.as_str()],
            &[("expand", PAGE_EXPAND.to_string())],
        )
        .await
}

/// Fetch the page, then PUT the new body with `version.number + 1`.
///
/// A failed fetch is returned as-is and no PUT is attempted.
pub async fn update_page_content(
    client: &AtlassianClient,
    request: &UpdatePageContentRequest,
) -> Result<Value, RemoteError> {
    let current = client
        .get(
            ApiRoot::Confluence,
            &["content", request.page_id.as_str()],
            &[("expand", UPDATE_LOOKUP_EXPAND.to_string())],
        )
        .await?;
    let body = build_update_body(request, &current)?;
    debug!(
        target: "confluence_mcp::tools",
        page_id = %request.page_id,
        next_version = body["version"]["number"].as_u64().unwrap_or_default(),
        "Updating Confluence page"
    );
    client
        .put_json(ApiRoot::Confluence, &["content", request.page_id.as_str()], &body)
        .await
}

/// Build the PUT body from the request and the currently stored page.
pub fn build_update_body(
    request: &UpdatePageContentRequest,
    current: &Value,
) -> Result<Value, RemoteError> {
    let version = current
        .pointer("/version/number")
        .and_then(Value::as_u64)
        .ok_or_else(|| RemoteError::UnexpectedPayload {
            message: format!("page {} has no version.number", request.page_id),
        })?;
    let next_version = version
        .checked_add(1)
        .ok_or_else(|| RemoteError::UnexpectedPayload {
            message: format!("page {} version {version} cannot be incremented", request.page_id),
        })?;
    let page_type = current
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("page");
    let title = match request.title.as_deref() {
        Some(title) => title,
        None => current
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| RemoteError::UnexpectedPayload {
                message: format!("page {} has no title to carry over", request.page_id),
            })?,
    };

    let mut body = json!({
        "id": request.page_id,
        "type": page_type,
        "title": title,
        "body": {
            "storage": {
                "value": request.content,
                "representation": "storage"
            }
        },
        "version": { "number": next_version }
    });
    if let Some(space_key) = current.pointer("/space/key").and_then(Value::as_str) {
        body["space"] = json!({ "key": space_key });
    }
    Ok(body)
}
