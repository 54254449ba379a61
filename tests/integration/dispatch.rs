use anyhow::Result;
use httpmock::prelude::*;
use rmcp::service::ServiceError;
use serde_json::{json, Value};

use confluence_mcp::tools::registry::TOOL_NAMES;

use crate::common::{error_data_of, Session};

#[tokio::test(flavor = "multi_thread")]
async fn list_tools_exposes_every_registered_tool() -> Result<()> {
    let server = MockServer::start_async().await;
    let session = Session::connect(&server.base_url()).await?;

    let listed = session.client().list_tools(None).await?;
    let names: Vec<String> = listed
        .tools
        .iter()
        .map(|tool| tool.name.to_string())
        .collect();
    assert_eq!(names, TOOL_NAMES.to_vec(), "tools/list must follow registry order");

    for tool in &listed.tools {
        assert!(
            tool.description.as_deref().is_some_and(|text| !text.is_empty()),
            "{} must carry a description",
            tool.name
        );
    }

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_required_field_is_named_in_details() -> Result<()> {
    let server = MockServer::start_async().await;
    let session = Session::connect(&server.base_url()).await?;

    let error = session
        .call("update_page_content", json!({ "pageId": "42" }))
        .await
        .expect_err("content is required");
    let data = error_data_of(error);
    assert_eq!(data["data"]["code"], json!("invalid_argument"));
    assert_eq!(data["data"]["details"]["field"], json!("content"));

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_tool_is_a_protocol_error() -> Result<()> {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|_when, then| {
            then.status(200).json_body(json!({}));
        })
        .await;
    let session = Session::connect(&server.base_url()).await?;

    let outcome = session.call("drop_database", json!({})).await;
    assert!(
        matches!(outcome, Err(ServiceError::McpError(_))),
        "unexpected outcome: {outcome:?}"
    );
    assert_eq!(any.hits_async().await, 0);

    session.close().await;
    Ok(())
}

/// Arguments that are missing, mistyped, blank or out of range for each tool.
fn invalid_calls() -> Vec<(&'static str, Value)> {
    vec![
        ("execute_cql_search", json!({})),
        ("execute_cql_search", json!({ "cql": "type=page", "limit": 0 })),
        ("execute_cql_search", json!({ "cql": "type=page", "limit": "5" })),
        ("get_page_content", json!({})),
        ("get_page_content", json!({ "pageId": "" })),
        ("get_page_content", json!({ "pageId": 42 })),
        ("update_page_content", json!({ "pageId": "42" })),
        ("update_page_content", json!({ "pageId": " ", "content": "x" })),
        ("execute_jql", json!({ "number_of_results": 2 })),
        ("execute_jql", json!({ "jql": "project = DEV", "number_of_results": 0 })),
        ("get_only_ticket_name_and_description", json!({ "jql": "" })),
        (
            "create_ticket",
            json!({ "project": { "key": "DEV" }, "summary": "s", "description": "d" }),
        ),
        (
            "create_ticket",
            json!({
                "project": { "key": "" },
                "summary": "s",
                "description": "d",
                "issuetype": { "name": "Bug" }
            }),
        ),
        ("list_projects", json!({ "number_of_results": 0 })),
        ("list_projects", json!({ "number_of_results": -1 })),
        ("delete_ticket", json!({})),
        ("edit_ticket", json!({ "summary": "only a summary" })),
        ("edit_ticket", json!({ "issueIdOrKey": "DEV-1", "labels": ["ok", " "] })),
        ("get_all_statuses", json!({ "number_of_results": 0 })),
        ("assign_ticket", json!({ "issueIdOrKey": "DEV-1" })),
        ("assign_ticket", json!({ "accountId": "abc", "issueIdOrKey": "  " })),
        ("query_assignable", json!({})),
    ]
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_arguments_never_reach_the_remote() -> Result<()> {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|_when, then| {
            then.status(200).json_body(json!({}));
        })
        .await;
    let session = Session::connect(&server.base_url()).await?;

    for (tool, arguments) in invalid_calls() {
        let outcome = session.call(tool, arguments.clone()).await;
        let error = match outcome {
            Err(error) => error,
            Ok(result) => panic!("{tool} accepted {arguments}: {result:?}"),
        };
        let data = error_data_of(error);
        assert_eq!(
            data["code"],
            json!(-32602),
            "{tool} with {arguments} should be invalid params: {data}"
        );
        assert_eq!(
            data["data"]["code"],
            json!("invalid_argument"),
            "{tool} with {arguments} should carry structured data: {data}"
        );
        assert_eq!(data["data"]["retryable"], json!(false));
        assert_eq!(data["data"]["tool"], json!(tool));
        assert!(
            data["data"]["details"]["reason"].is_string(),
            "{tool} with {arguments} should explain the rejection: {data}"
        );
    }
    assert_eq!(any.hits_async().await, 0);

    session.close().await;
    Ok(())
}
