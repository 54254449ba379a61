//! Confluence content tools.
pub mod pages;
pub mod search;

pub use pages::{
    build_update_body, get_page_content, update_page_content, GetPageContentRequest,
    UpdatePageContentRequest, PAGE_EXPAND,
};
pub use search::{execute_cql_search, ExecuteCqlSearchRequest, DEFAULT_CQL_LIMIT};
