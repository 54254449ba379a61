//! Jira issue tools served from the same Atlassian site.
pub mod catalog;
pub mod issues;
pub mod search;

pub use catalog::{
    get_all_statuses, list_projects, query_assignable, ListingRequest, QueryAssignableRequest,
};
pub use issues::{
    assign_ticket, build_create_body, build_edit_body, create_ticket, delete_ticket, edit_ticket,
    AssignTicketRequest, CreateTicketRequest, DeleteTicketRequest, EditTicketRequest,
    IssueTypeRef, ProjectRef,
};
pub use search::{
    execute_jql, get_only_ticket_name_and_description, JqlSearchRequest,
    DEFAULT_NUMBER_OF_RESULTS, SUMMARY_FIELDS,
};
