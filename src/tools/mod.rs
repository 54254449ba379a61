//! MCP tools registered on the server: argument handling, the Atlassian client and per-product tools.

pub mod arguments;
pub mod client;
pub mod confluence;
pub mod envelope;
pub mod jira;
pub mod registry;

pub use arguments::{
    argument_error_to_error_data, decode_arguments, ArgumentError, ToolArguments, ToolInput,
};
pub use client::{ApiRoot, AtlassianClient};
