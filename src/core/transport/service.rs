//! Transport service - runs every enabled transport side by side.
//!
//! All transports share one tool registry, and through it one session
//! registry. The service returns when a shutdown signal arrives, when a
//! transport fails, or when every transport has finished on its own.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::sse::SseTransport;
use super::stdio::StdioTransport;
use super::streamable::StreamableHttpTransport;
use super::{TransportConfig, TransportError, TransportResult};
use crate::core::McpServer;
use crate::core::config::AppConfig;
use crate::domains::tools::ToolRegistry;

/// How long transports get to wind down after shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Log information about the configured transports.
    pub fn log_info(&self) {
        info!("Starting transports: {}", self.config.description());
    }

    /// Start every enabled transport and wait for them.
    ///
    /// Stdio reaching end of input only ends that transport; the listeners
    /// keep serving. The first transport error stops everything and is
    /// returned.
    pub async fn run(self, config: Arc<AppConfig>, tools: Arc<ToolRegistry>) -> TransportResult<()> {
        self.log_info();

        let ct = CancellationToken::new();
        let mut transports = JoinSet::new();

        if self.config.stdio {
            let server = McpServer::stdio(config.clone(), tools.clone());
            transports.spawn(StdioTransport::run(server, ct.child_token()));
        }
        if let Some(addr) = &self.config.sse_addr {
            let server = McpServer::http(config.clone(), tools.clone());
            let transport = SseTransport::new(addr, self.config.enable_cors);
            transports.spawn(transport.run(server, ct.child_token()));
        }
        if let Some(addr) = &self.config.http_addr {
            let server = McpServer::http(config.clone(), tools.clone());
            let transport = StreamableHttpTransport::new(addr, self.config.enable_cors);
            transports.spawn(transport.run(server, ct.child_token()));
        }

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        let outcome = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break Ok(());
                }
                joined = transports.join_next() => match joined {
                    None => {
                        info!("All transports finished");
                        break Ok(());
                    }
                    Some(Ok(Ok(()))) => continue,
                    Some(Ok(Err(e))) => {
                        error!("Transport failed: {}", e);
                        break Err(e);
                    }
                    Some(Err(e)) => break Err(TransportError::ServiceError(e.to_string())),
                },
            }
        };

        ct.cancel();
        let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while transports.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!("Transports did not stop within {:?}, aborting", SHUTDOWN_GRACE);
            transports.abort_all();
        }

        outcome
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
