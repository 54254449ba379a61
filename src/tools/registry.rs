//! Registry order of the exposed tools.
use rmcp::model::Tool;

pub const EXECUTE_CQL_SEARCH: &str = "execute_cql_search";
pub const GET_PAGE_CONTENT: &str = "get_page_content";
pub const UPDATE_PAGE_CONTENT: &str = "update_page_content";
pub const EXECUTE_JQL: &str = "execute_jql";
pub const GET_ONLY_TICKET_NAME_AND_DESCRIPTION: &str = "get_only_ticket_name_and_description";
pub const CREATE_TICKET: &str = "create_ticket";
pub const LIST_PROJECTS: &str = "list_projects";
pub const DELETE_TICKET: &str = "delete_ticket";
pub const EDIT_TICKET: &str = "edit_ticket";
pub const GET_ALL_STATUSES: &str = "get_all_statuses";
pub const ASSIGN_TICKET: &str = "assign_ticket";
pub const QUERY_ASSIGNABLE: &str = "query_assignable";

/// Every tool name, in the order `tools/list` reports them.
pub const TOOL_NAMES: [&str; 12] = [
    EXECUTE_CQL_SEARCH,
    GET_PAGE_CONTENT,
    UPDATE_PAGE_CONTENT,
    EXECUTE_JQL,
    GET_ONLY_TICKET_NAME_AND_DESCRIPTION,
    CREATE_TICKET,
    LIST_PROJECTS,
    DELETE_TICKET,
    EDIT_TICKET,
    GET_ALL_STATUSES,
    ASSIGN_TICKET,
    QUERY_ASSIGNABLE,
];

pub fn position(name: &str) -> usize {
    TOOL_NAMES
        .iter()
        .position(|candidate| *candidate == name)
        .unwrap_or(TOOL_NAMES.len())
}

/// Sort router output into registry order.
pub fn ordered(mut tools: Vec<Tool>) -> Vec<Tool> {
    tools.sort_by_key(|tool| position(&tool.name));
    tools
}
