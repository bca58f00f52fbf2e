//! MCP server for Pextra CloudEnvironment (PCE).
//!
//! Exposes the PCE management API as MCP tools over stdio, SSE and
//! streamable HTTP at the same time. Each MCP session gets its own backend
//! client from the [`SessionRegistry`](core::SessionRegistry); the
//! credential of each call travels with that call only.
//!
//! # Architecture
//!
//! - **api**: typed client for the PCE REST API
//! - **core**: configuration, errors, session registry, server handler, transports
//! - **domains**: the tools exposed to MCP clients
//!
//! # Example
//!
//! ```rust,no_run
//! use pce_mcp_server::core::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> pce_mcp_server::Result<()> {
//!     let config = AppConfig::new("https://10.0.0.5:5007");
//!     pce_mcp_server::serve(config).await
//! }
//! ```

pub mod api;
pub mod core;
pub mod domains;

use std::sync::Arc;

use tracing::info;

pub use crate::core::{AppConfig, Error, McpServer, Result, SessionRegistry};
use crate::api::ApiClient;
use crate::core::TransportService;
use crate::core::config::ConfigError;
use crate::domains::tools::ToolRegistry;

/// Run every configured transport until shutdown.
pub async fn serve(config: AppConfig) -> Result<()> {
    // Every session builds its client from these settings; fail before
    // listening if none could be built.
    ApiClient::new(&config.client).map_err(|e| ConfigError::new(e.to_string()))?;

    let config = Arc::new(config);
    let sessions = Arc::new(SessionRegistry::from_settings(config.client.clone()));
    let tools = Arc::new(ToolRegistry::new(sessions));
    info!(
        tools = tools.tool_names().len(),
        backend = %config.client.base_url,
        "Server initialized"
    );

    TransportService::new(config.transport.clone())
        .run(config, tools)
        .await?;
    Ok(())
}
