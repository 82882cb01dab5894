//! search_links tool implementation.
//!
//! Searches the web for a query and returns link titles and snippets,
//! serving repeated queries from the shared result cache.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use skry_core::{Error, SearchHit, search_key};

use crate::state::{AppState, ToolValue};
use crate::tools::error_result;

/// Input parameters for search_links tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchLinksParams {
    /// Search query (required, non-empty).
    pub query: String,
}

/// Implementation of the search_links tool.
pub async fn search_links_impl(state: &AppState, params: SearchLinksParams) -> CallToolResult {
    match run(state, params).await {
        Ok(hits) => CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&hits).unwrap_or_default(),
        )]),
        Err(e) => {
            if e.is_validation() {
                tracing::warn!(error = %e, "rejected search_links input");
            } else {
                tracing::error!(error = %e, "link search failed");
            }
            error_result(&e)
        }
    }
}

async fn run(state: &AppState, params: SearchLinksParams) -> Result<Vec<SearchHit>, Error> {
    let query = params.query.trim().to_string();
    if query.is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()));
    }

    tracing::info!(%query, "searching for links");

    let key = search_key(&query);
    let port = Arc::clone(&state.search);
    let max_results = state.config.max_search_results;
    let backend_query = query.clone();

    let value = state
        .flights
        .execute(&key, move || async move {
            let hits = port.search(&backend_query, max_results).await?;
            Ok(ToolValue::Links(hits))
        })
        .await?;

    match value {
        ToolValue::Links(hits) => {
            tracing::info!(count = hits.len(), "found search results");
            Ok(hits)
        }
        ToolValue::Pages(_) => Err(Error::Internal("cache entry kind mismatch".into())),
    }
}
