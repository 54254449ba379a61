use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;

use crate::common::{error_data_of, json_of, text_of, Session, EXPECTED_AUTH};

#[tokio::test(flavor = "multi_thread")]
async fn cql_search_forwards_query_and_returns_body_verbatim() -> Result<()> {
    let server = MockServer::start_async().await;
    let body = json!({
        "results": [{ "id": "1", "type": "page", "title": "Home" }],
        "size": 1
    });
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wiki/rest/api/content/search")
                .query_param("cql", "type=page")
                .query_param("limit", "5")
                .header("authorization", EXPECTED_AUTH)
                .header("accept", "application/json");
            then.status(200).json_body(body.clone());
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    let result = session
        .call("execute_cql_search", json!({ "cql": "type=page", "limit": 5 }))
        .await?;

    search.assert_async().await;
    assert_ne!(result.is_error, Some(true));
    assert_eq!(json_of(&result), body);
    assert_eq!(text_of(&result), serde_json::to_string_pretty(&body)?);

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cql_search_defaults_limit_to_ten() -> Result<()> {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wiki/rest/api/content/search")
                .query_param("cql", "space = DEV")
                .query_param("limit", "10");
            then.status(200).json_body(json!({ "results": [], "size": 0 }));
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    session
        .call("execute_cql_search", json!({ "cql": "space = DEV" }))
        .await?;

    search.assert_async().await;
    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn page_fetch_is_repeatable() -> Result<()> {
    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wiki/rest/api/content/42")
                .query_param("expand", "body.storage,version");
            then.status(200).json_body(json!({
                "id": "42",
                "title": "Runbook",
                "body": { "storage": { "value": "<p>hi</p>", "representation": "storage" } },
                "version": { "number": 3 }
            }));
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    let first = session
        .call("get_page_content", json!({ "pageId": "42" }))
        .await?;
    let second = session
        .call("get_page_content", json!({ "pageId": "42" }))
        .await?;

    assert_eq!(text_of(&first), text_of(&second));
    assert_eq!(json_of(&first)["version"]["number"], json!(3));
    assert_eq!(page.hits_async().await, 2);

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn page_update_bumps_version_and_keeps_title() -> Result<()> {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wiki/rest/api/content/42")
                .query_param("expand", "version,space");
            then.status(200).json_body(json!({
                "id": "42",
                "type": "page",
                "title": "Runbook",
                "version": { "number": 3 }
            }));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/wiki/rest/api/content/42")
                .header("authorization", EXPECTED_AUTH)
                .json_body(json!({
                    "id": "42",
                    "type": "page",
                    "title": "Runbook",
                    "body": { "storage": { "value": "<p>v4</p>", "representation": "storage" } },
                    "version": { "number": 4 }
                }));
            then.status(200)
                .json_body(json!({ "id": "42", "version": { "number": 4 } }));
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    let result = session
        .call(
            "update_page_content",
            json!({ "pageId": "42", "content": "<p>v4</p>" }),
        )
        .await?;

    lookup.assert_async().await;
    update.assert_async().await;
    assert_eq!(json_of(&result)["version"]["number"], json!(4));

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn page_update_with_new_title_sends_it() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wiki/rest/api/content/7");
            then.status(200).json_body(json!({
                "id": "7",
                "type": "page",
                "title": "Old",
                "space": { "key": "DEV" },
                "version": { "number": 1 }
            }));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/wiki/rest/api/content/7").json_body(json!({
                "id": "7",
                "type": "page",
                "title": "New",
                "space": { "key": "DEV" },
                "body": { "storage": { "value": "x", "representation": "storage" } },
                "version": { "number": 2 }
            }));
            then.status(200).json_body(json!({ "id": "7" }));
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    session
        .call(
            "update_page_content",
            json!({ "pageId": "7", "content": "x", "title": "New" }),
        )
        .await?;

    update.assert_async().await;
    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_lookup_never_writes() -> Result<()> {
    let server = MockServer::start_async().await;
    let not_found = json!({ "statusCode": 404, "message": "No content found with id 404" });
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wiki/rest/api/content/404");
            then.status(404).json_body(not_found.clone());
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/wiki/rest/api/content/404");
            then.status(200).json_body(json!({}));
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    let result = session
        .call(
            "update_page_content",
            json!({ "pageId": "404", "content": "<p>lost</p>" }),
        )
        .await?;

    assert_eq!(json_of(&result), json!({ "error": not_found }));
    assert_eq!(update.hits_async().await, 0);

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn page_without_version_is_not_written() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wiki/rest/api/content/9");
            then.status(200).json_body(json!({ "id": "9", "title": "No version" }));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/wiki/rest/api/content/9");
            then.status(200).json_body(json!({}));
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    let result = session
        .call("update_page_content", json!({ "pageId": "9", "content": "x" }))
        .await?;

    let error = json_of(&result)["error"].clone();
    assert!(
        error
            .as_str()
            .is_some_and(|message| message.starts_with("unexpected remote payload")),
        "{error}"
    );
    assert_eq!(update.hits_async().await, 0);

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn remote_404_is_returned_as_error_payload() -> Result<()> {
    let server = MockServer::start_async().await;
    let body = json!({ "statusCode": 404, "message": "page missing" });
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wiki/rest/api/content/1");
            then.status(404).json_body(body.clone());
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    let result = session
        .call("get_page_content", json!({ "pageId": "1" }))
        .await?;

    assert_ne!(result.is_error, Some(true));
    assert_eq!(json_of(&result), json!({ "error": body }));

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_cql_is_rejected_before_any_request() -> Result<()> {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|_when, then| {
            then.status(200).json_body(json!({}));
        })
        .await;

    let session = Session::connect(&server.base_url()).await?;
    let error = session
        .call("execute_cql_search", json!({ "cql": "   " }))
        .await
        .expect_err("blank cql must be rejected");

    let data = error_data_of(error);
    assert_eq!(data["data"]["code"], json!("invalid_argument"));
    assert_eq!(data["data"]["details"]["field"], json!("cql"));
    assert_eq!(data["data"]["tool"], json!("execute_cql_search"));
    assert_eq!(any.hits_async().await, 0);

    session.close().await;
    Ok(())
}
