//! Ticket create, edit, delete and assignment.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{
    lib::errors::RemoteError,
    tools::{
        arguments::{optional_text, require_text, ArgumentError, ToolArguments},
        client::{ApiRoot, AtlassianClient},
    },
};

const EDITABLE_FIELDS: &str = "summary, description, labels, parent";

/// `{ "key": ... }` reference to a Jira project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectRef {
    /// Project key, e.g. `DEV`.
    pub key: String,
}

/// `{ "name": ... }` reference to an issue type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IssueTypeRef {
    /// Issue type name, e.g. `Task`, `Bug`, `Story`.
    pub name: String,
}

/// Input for `create_ticket`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateTicketRequest {
    pub project: ProjectRef,
    /// One-line ticket title.
    pub summary: String,
    pub description: String,
    pub issuetype: IssueTypeRef,
    /// Key of the parent issue (epic or story).
    #[serde(default)]
    pub parent: Option<String>,
}

impl ToolArguments for CreateTicketRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("project.key", &self.project.key)?;
        require_text("summary", &self.summary)?;
        require_text("description", &self.description)?;
        require_text("issuetype.name", &self.issuetype.name)?;
        optional_text("parent", self.parent.as_deref())
    }
}

/// Input for `delete_ticket`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteTicketRequest {
    /// Issue ID or key, e.g. `DEV-42`.
    #[serde(rename = "issueIdOrKey")]
    pub issue_id_or_key: String,
}

impl ToolArguments for DeleteTicketRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("issueIdOrKey", &self.issue_id_or_key)
    }
}

/// Input for `edit_ticket`. Only the provided fields are changed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EditTicketRequest {
    /// Issue ID or key, e.g. `DEV-42`.
    #[serde(rename = "issueIdOrKey")]
    pub issue_id_or_key: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Replaces the full label set.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Key of the new parent issue.
    #[serde(default)]
    pub parent: Option<String>,
}

impl ToolArguments for EditTicketRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("issueIdOrKey", &self.issue_id_or_key)?;
        optional_text("summary", self.summary.as_deref())?;
        optional_text("parent", self.parent.as_deref())?;
        if let Some(labels) = &self.labels {
            if labels.iter().any(|label| label.trim().is_empty()) {
                return Err(ArgumentError::EmptyEntry { field: "labels" });
            }
        }
        if self.summary.is_none()
            && self.description.is_none()
            && self.labels.is_none()
            && self.parent.is_none()
        {
            return Err(ArgumentError::NothingToUpdate {
                fields: EDITABLE_FIELDS,
            });
        }
        Ok(())
    }
}

/// Input for `assign_ticket`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssignTicketRequest {
    /// Atlassian account ID of the assignee (see `query_assignable`).
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// Issue ID or key, e.g. `DEV-42`.
    #[serde(rename = "issueIdOrKey")]
    pub issue_id_or_key: String,
}

impl ToolArguments for AssignTicketRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("accountId", &self.account_id)?;
        require_text("issueIdOrKey", &self.issue_id_or_key)
    }
}

pub async fn create_ticket(
    client: &AtlassianClient,
    request: &CreateTicketRequest,
) -> Result<Value, RemoteError> {
    client
        .post_json(ApiRoot::Jira, &["issue"], &build_create_body(request))
        .await
}

pub async fn delete_ticket(
    client: &AtlassianClient,
    request: &DeleteTicketRequest,
) -> Result<Value, RemoteError> {
    client
        .delete(ApiRoot::Jira, &["issue", request.issue_id_or_key.as_str()])
        .await
}

pub async fn edit_ticket(
    client: &AtlassianClient,
    request: &EditTicketRequest,
) -> Result<Value, RemoteError> {
    client
        .put_json(
            ApiRoot::Jira,
            &["issue", request.issue_id_or_key.as_str()],
            &build_edit_body(request),
        )
        .await
}

pub async fn assign_ticket(
    client: &AtlassianClient,
    request: &AssignTicketRequest,
) -> Result<Value, RemoteError> {
    client
        .put_json(
            ApiRoot::Jira,
            &["issue", request.issue_id_or_key.as_str(), "assignee"],
            &json!({ "accountId": request.account_id }),
        )
        .await
}

pub fn build_create_body(request: &CreateTicketRequest) -> Value {
    let mut fields = json!({
        "project": { "key": request.project.key },
        "summary": request.summary,
        "description": request.description,
        "issuetype": { "name": request.issuetype.name }
    });
    if let Some(parent) = &request.parent {
        fields["parent"] = json!({ "key": parent });
    }
    json!({ "fields": fields })
}

pub fn build_edit_body(request: &EditTicketRequest) -> Value {
    let mut fields = Map::new();
    if let Some(summary) = &request.summary {
        fields.insert("summary".into(), json!(summary));
    }
    if let Some(description) = &request.description {
        fields.insert("description".into(), json!(description));
    }
    if let Some(labels) = &request.labels {
        fields.insert("labels".into(), json!(labels));
    }
    if let Some(parent) = &request.parent {
        fields.insert("parent".into(), json!({ "key": parent }));
    }
    json!({ "fields": fields })
}
