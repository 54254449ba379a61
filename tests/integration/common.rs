use std::{io, path::Path, process::Stdio};

use anyhow::{Context, Result};
use reqwest::Url;
use rmcp::{
    model::{CallToolRequestParam, CallToolResult, ClientInfo},
    serve_client,
    service::{RunningService, ServiceError},
    RoleClient, ServiceExt,
};
use serde_json::Value;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadBuf},
    process::{Child, ChildStdin, ChildStdout, Command},
    task::JoinHandle,
};

use confluence_mcp::server::{
    config::{AtlassianConfig, ConfigSource, ServerConfig},
    runtime::ConfluenceServer,
};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_confluence-mcp");
pub const EMAIL: &str = "agent@example.com";
pub const API_TOKEN: &str = "token-123";
/// `Basic base64("agent@example.com:token-123")`
pub const EXPECTED_AUTH: &str = "Basic YWdlbnRAZXhhbXBsZS5jb206dG9rZW4tMTIz";

pub fn test_config(base_url: &str) -> ServerConfig {
    ServerConfig {
        atlassian: AtlassianConfig {
            base_url: Url::parse(base_url).expect("mock server url"),
            email: EMAIL.into(),
            api_token: API_TOKEN.into(),
            confluence_api_path: "/wiki/rest/api".into(),
            jira_api_path: "/rest/api/2".into(),
            timeout_secs: Some(5),
        },
        source: ConfigSource::Environment,
    }
}

/// In-process client/server pair connected over an in-memory duplex stream.
pub struct Session {
    client: RunningService<RoleClient, ClientInfo>,
    server_task: JoinHandle<Result<()>>,
}

impl Session {
    pub async fn connect(base_url: &str) -> Result<Self> {
        let server = ConfluenceServer::new(&test_config(base_url), "integration".into())?;
        let (server_transport, client_transport) = tokio::io::duplex(4096);
        let server_task = tokio::spawn(async move {
            server.serve(server_transport).await?.waiting().await?;
            Result::<_, anyhow::Error>::Ok(())
        });
        let client = serve_client(ClientInfo::default(), client_transport).await?;
        Ok(Self {
            client,
            server_task,
        })
    }

    pub fn client(&self) -> &RunningService<RoleClient, ClientInfo> {
        &self.client
    }

    pub async fn call(&self, name: &str, arguments: Value) -> Result<CallToolResult, ServiceError> {
        self.client
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: arguments.as_object().cloned(),
            })
            .await
    }

    pub async fn close(self) {
        let _ = self.client.cancel().await;
        let _ = self.server_task.await;
    }
}

pub fn text_of(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1, "exactly one content item expected");
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|text| text.text.clone())
        .expect("text content")
}

pub fn json_of(result: &CallToolResult) -> Value {
    serde_json::from_str(&text_of(result)).expect("tool text is JSON")
}

/// Error data of a protocol-level failure.
pub fn error_data_of(error: ServiceError) -> Value {
    match error {
        ServiceError::McpError(inner) => serde_json::to_value(inner).expect("serializable error"),
        other => panic!("expected an MCP error, got {other:?}"),
    }
}

pub async fn spawn_server_process(
    base_url: &str,
    cwd: &Path,
) -> Result<(Child, ChildIoBridge, Option<JoinHandle<()>>)> {
    let mut command = Command::new(BINARY_PATH);
    command
        .current_dir(cwd)
        .env_remove("MCP_CONFIG_PATH")
        .env("CONFLUENCE_BASE_URL", base_url)
        .env("CONFLUENCE_EMAIL", EMAIL)
        .env("CONFLUENCE_API_TOKEN", API_TOKEN)
        .stdout(Stdio::piped())
        .stdin(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().context("failed to spawn server process")?;
    let stdout = child.stdout.take().expect("child stdout");
    let stdin = child.stdin.take().expect("child stdin");
    let bridge = ChildIoBridge::new(stdout, stdin);
    let stderr_handle = child.stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
        })
    });
    Ok((child, bridge, stderr_handle))
}

pub struct ChildIoBridge {
    stdout: ChildStdout,
    stdin: ChildStdin,
}

impl ChildIoBridge {
    pub fn new(stdout: ChildStdout, stdin: ChildStdin) -> Self {
        Self { stdout, stdin }
    }
}

impl AsyncRead for ChildIoBridge {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdout).poll_read(cx, buf)
    }
}

impl AsyncWrite for ChildIoBridge {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        data: &[u8],
    ) -> std::task::Poll<io::Result<usize>> {
        std::pin::Pin::new(&mut self.stdin).poll_write(cx, data)
    }

    fn poll_flush(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_shutdown(cx)
    }
}
