//! skry server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to
//! avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

use skry_client::{CrawlConfig, DdgClient, FetchConfig, PageCrawler, SearchConfig};
use skry_core::AppConfig;

mod handler;
mod state;
mod tools;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    tracing::info!("starting skry server on stdio transport");

    let search = Arc::new(DdgClient::new(SearchConfig {
        timeout: config.timeout(),
        user_agent: config.user_agent.clone(),
        ..Default::default()
    })?);

    let crawler = Arc::new(PageCrawler::new(CrawlConfig {
        concurrency: config.crawl_concurrency,
        fetch: FetchConfig {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        },
    })?);

    let state = Arc::new(AppState::new(config, search, crawler));
    spawn_cache_sweep(&state);

    let handler = handler::SkryServer::new(state);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

/// Periodically drop expired cache entries so a long idle stretch does
/// not pin stale results in memory; reads expire entries lazily anyway.
fn spawn_cache_sweep(state: &Arc<AppState>) {
    let state = Arc::clone(state);
    let period = (state.config.cache_ttl() / 4).max(Duration::from_secs(60));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // first tick completes immediately
        loop {
            ticker.tick().await;
            state.flights.store().purge_expired();
        }
    });
}
