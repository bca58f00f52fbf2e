//! STDIO transport implementation.
//!
//! One client on stdin/stdout. Every call uses the fixed stdio session and
//! the credential configured at startup.

use rmcp::ServiceExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve until stdin closes or `ct` is cancelled.
    pub async fn run(server: McpServer, ct: CancellationToken) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve_with_ct(rmcp::transport::stdio(), ct)
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!(?reason, "STDIO transport finished");
        Ok(())
    }
}
