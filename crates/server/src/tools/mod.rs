//! MCP tool implementations.
//!
//! This module contains the two tools exposed by the skry server.

pub mod crawl_urls;
pub mod search_links;

use rmcp::model::{CallToolResult, Content};

use skry_core::Error;

/// Shape a failure the way these tools have always reported it: an
/// error-flagged result whose content is `{"error": "<message>"}`.
pub fn error_result(err: &Error) -> CallToolResult {
    let payload = serde_json::json!({ "error": err.to_string() });
    CallToolResult::error(vec![Content::text(payload.to_string())])
}
