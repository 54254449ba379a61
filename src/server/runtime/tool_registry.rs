use std::sync::Arc;

use rmcp::{
    handler::server::{
        common::cached_schema_for_type,
        router::tool::ToolRouter,
        tool::ToolCallContext,
        ServerHandler,
    },
    model::{
        CallToolRequestParam, CallToolResult, ErrorData, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_router, RoleServer,
};
use tracing::warn;

use crate::{
    lib::{
        errors::ClientBuildError,
        telemetry::{ToolCallOutcome, ToolCallSpan},
    },
    server::config::ServerConfig,
    tools::{
        argument_error_to_error_data,
        confluence::{
            self, ExecuteCqlSearchRequest, GetPageContentRequest, UpdatePageContentRequest,
        },
        envelope,
        jira::{
            self, AssignTicketRequest, CreateTicketRequest, DeleteTicketRequest,
            EditTicketRequest, JqlSearchRequest, ListingRequest, QueryAssignableRequest,
        },
        registry, AtlassianClient, ToolArguments, ToolInput,
    },
};

#[derive(Clone)]
pub struct ConfluenceServer {
    client: AtlassianClient,
    instructions: Arc<String>,
    tool_router: ToolRouter<Self>,
}

impl ConfluenceServer {
    pub fn new(config: &ServerConfig, instructions: String) -> Result<Self, ClientBuildError> {
        let client = AtlassianClient::new(&config.atlassian)?;
        Ok(Self {
            client,
            instructions: Arc::new(instructions),
            tool_router: Self::tool_router(),
        })
    }

    /// Descriptors for every registered tool, in registry order.
    pub fn tool_descriptors() -> Vec<Tool> {
        registry::ordered(Self::tool_router().list_all())
    }

    /// Open the call span, rejecting invalid arguments before any remote call.
    fn accept<A: ToolArguments>(tool: &'static str, request: &A) -> Result<ToolCallSpan, ErrorData> {
        let span = ToolCallSpan::start(tool);
        if let Err(err) = request.validate() {
            warn!(
                target: "confluence_mcp::tools",
                call_id = %span.call_id(),
                tool,
                reason = %err,
                "Rejected tool arguments"
            );
            span.finish(ToolCallOutcome::InvalidArgument);
            return Err(argument_error_to_error_data(tool, err));
        }
        Ok(span)
    }
}

#[tool_router(router = tool_router)]
impl ConfluenceServer {
    #[tool(
        name = "execute_cql_search",
        description = "Search Confluence content with a CQL query and return the raw search result",
        input_schema = cached_schema_for_type::<ExecuteCqlSearchRequest>()
    )]
    async fn execute_cql_search(
        &self,
        ToolInput(request): ToolInput<ExecuteCqlSearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::EXECUTE_CQL_SEARCH, &request)?;
        let outcome = confluence::execute_cql_search(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "get_page_content",
        description = "Fetch a Confluence page including its storage-format body and version",
        input_schema = cached_schema_for_type::<GetPageContentRequest>()
    )]
    async fn get_page_content(
        &self,
        ToolInput(request): ToolInput<GetPageContentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::GET_PAGE_CONTENT, &request)?;
        let outcome = confluence::get_page_content(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "update_page_content",
        description = "Replace the body of a Confluence page (storage format); bumps the page version and keeps the title unless a new one is given",
        input_schema = cached_schema_for_type::<UpdatePageContentRequest>()
    )]
    async fn update_page_content(
        &self,
        ToolInput(request): ToolInput<UpdatePageContentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::UPDATE_PAGE_CONTENT, &request)?;
        let outcome = confluence::update_page_content(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "execute_jql",
        description = "Run a JQL search against Jira and return the raw search result",
        input_schema = cached_schema_for_type::<JqlSearchRequest>()
    )]
    async fn execute_jql(
        &self,
        ToolInput(request): ToolInput<JqlSearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::EXECUTE_JQL, &request)?;
        let outcome = jira::execute_jql(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "get_only_ticket_name_and_description",
        description = "Run a JQL search returning only the summary and description of each ticket",
        input_schema = cached_schema_for_type::<JqlSearchRequest>()
    )]
    async fn get_only_ticket_name_and_description(
        &self,
        ToolInput(request): ToolInput<JqlSearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::GET_ONLY_TICKET_NAME_AND_DESCRIPTION, &request)?;
        let outcome = jira::get_only_ticket_name_and_description(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "create_ticket",
        description = "Create a Jira ticket in a project with a summary, description, issue type and optional parent",
        input_schema = cached_schema_for_type::<CreateTicketRequest>()
    )]
    async fn create_ticket(
        &self,
        ToolInput(request): ToolInput<CreateTicketRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::CREATE_TICKET, &request)?;
        let outcome = jira::create_ticket(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "list_projects",
        description = "List Jira projects",
        input_schema = cached_schema_for_type::<ListingRequest>()
    )]
    async fn list_projects(
        &self,
        ToolInput(request): ToolInput<ListingRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::LIST_PROJECTS, &request)?;
        let outcome = jira::list_projects(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "delete_ticket",
        description = "Delete a Jira ticket by ID or key",
        input_schema = cached_schema_for_type::<DeleteTicketRequest>()
    )]
    async fn delete_ticket(
        &self,
        ToolInput(request): ToolInput<DeleteTicketRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::DELETE_TICKET, &request)?;
        let outcome = jira::delete_ticket(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "edit_ticket",
        description = "Edit the summary, description, labels or parent of a Jira ticket",
        input_schema = cached_schema_for_type::<EditTicketRequest>()
    )]
    async fn edit_ticket(
        &self,
        ToolInput(request): ToolInput<EditTicketRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::EDIT_TICKET, &request)?;
        let outcome = jira::edit_ticket(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "get_all_statuses",
        description = "List Jira workflow statuses",
        input_schema = cached_schema_for_type::<ListingRequest>()
    )]
    async fn get_all_statuses(
        &self,
        ToolInput(request): ToolInput<ListingRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::GET_ALL_STATUSES, &request)?;
        let outcome = jira::get_all_statuses(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "assign_ticket",
        description = "Assign a Jira ticket to a user by Atlassian account ID",
        input_schema = cached_schema_for_type::<AssignTicketRequest>()
    )]
    async fn assign_ticket(
        &self,
        ToolInput(request): ToolInput<AssignTicketRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::ASSIGN_TICKET, &request)?;
        let outcome = jira::assign_ticket(&self.client, &request).await;
        envelope::complete(span, outcome)
    }

    #[tool(
        name = "query_assignable",
        description = "List users that can be assigned tickets in a Jira project",
        input_schema = cached_schema_for_type::<QueryAssignableRequest>()
    )]
    async fn query_assignable(
        &self,
        ToolInput(request): ToolInput<QueryAssignableRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = Self::accept(registry::QUERY_ASSIGNABLE, &request)?;
        let outcome = jira::query_assignable(&self.client, &request).await;
        envelope::complete(span, outcome)
    }
}

impl ServerHandler for ConfluenceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some((*self.instructions).clone()),
            ..ServerInfo::default()
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let call = ToolCallContext::new(self, request, context);
        self.tool_router.call(call).await
    }

    /// Listed in registry order; the router itself keeps no order.
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(registry::ordered(
            self.tool_router.list_all(),
        )))
    }
}
