//! Streamable HTTP transport implementation.
//!
//! rmcp's [`StreamableHttpService`] handles the protocol at `/mcp`. A thin
//! middleware mirrors its session lifecycle into the session registry: a
//! session is registered when the server hands out an `Mcp-Session-Id`, and
//! unregistered when the client deletes it.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::Method,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{TransportError, TransportResult};
use crate::core::McpServer;
use crate::core::session::{SESSION_ID_HEADER, SessionRegistry};

/// Streamable HTTP transport handler.
pub struct StreamableHttpTransport {
    addr: String,
    enable_cors: bool,
}

impl StreamableHttpTransport {
    pub fn new(addr: impl Into<String>, enable_cors: bool) -> Self {
        Self {
            addr: addr.into(),
            enable_cors,
        }
    }

    /// Routes served by this transport.
    pub fn router(server: McpServer, ct: CancellationToken, enable_cors: bool) -> Router {
        let sessions = server.tools().sessions().clone();
        let service = StreamableHttpService::new(
            move || Ok(server.clone()),
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig {
                stateful_mode: true,
                cancellation_token: ct,
                ..Default::default()
            },
        );

        let app = Router::new()
            .nest_service("/mcp", service)
            .route_layer(middleware::from_fn_with_state(sessions, track_sessions))
            .route("/health", get(health_check))
            .layer(TraceLayer::new_for_http());

        if enable_cors {
            app.layer(cors_layer())
        } else {
            app
        }
    }

    /// Serve until `ct` is cancelled.
    pub async fn run(self, server: McpServer, ct: CancellationToken) -> TransportResult<()> {
        let app = Self::router(server, ct.child_token(), self.enable_cors);

        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| TransportError::bind(&self.addr, e))?;

        info!("Ready - streamable HTTP transport listening on {}", self.addr);
        info!("  → MCP:    POST/GET/DELETE /mcp");
        info!("  → Health: GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { ct.cancelled().await })
            .await
            .map_err(|e| TransportError::serve("streamable HTTP", e.to_string()))?;

        info!("Streamable HTTP transport stopped");
        Ok(())
    }
}

/// Keep the session registry in step with the sessions rmcp hands out.
async fn track_sessions(
    State(sessions): State<Arc<SessionRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let incoming = request
        .headers()
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let response = next.run(request).await;

    match (method, incoming) {
        (Method::POST, None) => {
            let issued = response
                .headers()
                .get(SESSION_ID_HEADER)
                .and_then(|v| v.to_str().ok());
            if let Some(session_id) = issued {
                if let Err(e) = sessions.register(session_id) {
                    warn!(session_id, "Failed to register session: {}", e);
                }
            }
        }
        (Method::DELETE, Some(session_id)) if response.status().is_success() => {
            sessions.unregister(&session_id);
        }
        _ => {}
    }

    response
}

/// Health check endpoint.
pub(super) async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub(super) fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientSettings;
    use axum::body::Body;
    use tower::ServiceExt;

    fn sessions() -> Arc<SessionRegistry> {
        Arc::new(SessionRegistry::from_settings(ClientSettings::new(
            "http://127.0.0.1:9",
        )))
    }

    fn app(sessions: Arc<SessionRegistry>, issued: &'static str) -> Router {
        Router::new()
            .route(
                "/mcp",
                axum::routing::post(move || async move { ([(SESSION_ID_HEADER, issued)], "ok") })
                    .delete(|| async { "gone" }),
            )
            .route_layer(middleware::from_fn_with_state(sessions, track_sessions))
    }

    #[tokio::test]
    async fn test_issued_session_is_registered() {
        let sessions = sessions();
        let response = app(sessions.clone(), "sess-1")
            .oneshot(axum::http::Request::post("/mcp").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert!(sessions.contains("sess-1"));
    }

    #[tokio::test]
    async fn test_existing_session_not_reregistered() {
        let sessions = sessions();
        app(sessions.clone(), "sess-2")
            .oneshot(
                axum::http::Request::post("/mcp")
                    .header(SESSION_ID_HEADER, "sess-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(!sessions.contains("sess-2"));
    }

    #[tokio::test]
    async fn test_delete_unregisters() {
        let sessions = sessions();
        sessions.register("sess-1").unwrap();
        app(sessions.clone(), "unused")
            .oneshot(
                axum::http::Request::delete("/mcp")
                    .header(SESSION_ID_HEADER, "sess-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(!sessions.contains("sess-1"));
    }
}
