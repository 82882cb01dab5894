//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::state::AppState;
use crate::tools::crawl_urls::{CrawlUrlsParams, crawl_urls_impl};
use crate::tools::search_links::{SearchLinksParams, search_links_impl};

/// The main MCP server handler for skry.
#[derive(Clone)]
pub struct SkryServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SkryServer {
    /// Create a new server handler over shared state.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Search the web for a given query and return link titles only. Use this tool when you need web pages related to a topic without their full content."
    )]
    async fn search_links(&self, params: Parameters<SearchLinksParams>) -> Result<CallToolResult, McpError> {
        Ok(search_links_impl(&self.state, params.0).await)
    }

    #[tool(
        description = "Crawl specific URLs and return their content as markdown. Use this tool when you need the full content of specific web pages for analysis or summarization."
    )]
    async fn crawl_urls(&self, params: Parameters<CrawlUrlsParams>) -> Result<CallToolResult, McpError> {
        Ok(crawl_urls_impl(&self.state, params.0).await)
    }
}

impl ServerHandler for SkryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "skry".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
