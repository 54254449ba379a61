//! HTTP client bound to one Atlassian site.
use std::time::Duration;

use reqwest::{
    header::{HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Method, RequestBuilder, StatusCode, Url,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    lib::{
        basic_auth,
        errors::{ClientBuildError, RemoteError},
    },
    server::config::AtlassianConfig,
};

/// REST API family a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoot {
    Confluence,
    Jira,
}

/// Issues authenticated requests and normalizes failures into [`RemoteError`].
#[derive(Clone)]
pub struct AtlassianClient {
    http: Client,
    base_url: Url,
    confluence_api_path: String,
    jira_api_path: String,
    authorization: HeaderValue,
}

impl AtlassianClient {
    pub fn new(config: &AtlassianConfig) -> Result<Self, ClientBuildError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            confluence_api_path: config.confluence_api_path.clone(),
            jira_api_path: config.jira_api_path.clone(),
            authorization: basic_auth::authorization_header(&config.email, &config.api_token)?,
        })
    }

    /// Resolve `segments` under the API root. Each segment is percent-encoded on its own.
    pub fn endpoint(&self, root: ApiRoot, segments: &[&str]) -> Result<Url, RemoteError> {
        let api_path = match root {
            ApiRoot::Confluence => self.confluence_api_path.as_str(),
            ApiRoot::Jira => self.jira_api_path.as_str(),
        };
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Transport {
                message: format!("base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(api_path.split('/').filter(|part| !part.is_empty()))
            .extend(segments);
        Ok(url)
    }

    pub async fn get(
        &self,
        root: ApiRoot,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value, RemoteError> {
        let url = self.endpoint(root, segments)?;
        self.execute(self.request(Method::GET, url).query(query))
            .await
    }

    pub async fn post_json<B>(
        &self,
        root: ApiRoot,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(root, segments)?;
        self.execute(self.request(Method::POST, url).json(body))
            .await
    }

    pub async fn put_json<B>(
        &self,
        root: ApiRoot,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(root, segments)?;
        self.execute(self.request(Method::PUT, url).json(body))
            .await
    }

    pub async fn delete(&self, root: ApiRoot, segments: &[&str]) -> Result<Value, RemoteError> {
        let url = self.endpoint(root, segments)?;
        self.execute(self.request(Method::DELETE, url)).await
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(
            target: "confluence_mcp::tools",
            method = %method,
            path = url.path(),
            "Sending Atlassian request"
        );
        self.http
            .request(method, url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, "application/json")
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, RemoteError> {
        let response = request.send().await.map_err(RemoteError::transport)?;
        let status = response.status();
        let text = response.text().await.map_err(RemoteError::transport)?;

        if !status.is_success() {
            warn!(
                target: "confluence_mcp::tools",
                status = status.as_u16(),
                "Atlassian request failed"
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: error_body(status, &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(json!({ "status": status.as_u16() }));
        }
        Ok(parse_body(&text))
    }
}

/// JSON bodies are kept as-is; anything else becomes a JSON string.
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn error_body(status: StatusCode, text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::String(format!("HTTP {status}"));
    }
    parse_body(text)
}
