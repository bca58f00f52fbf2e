//! SSE transport implementation.
//!
//! The legacy two-endpoint MCP transport. A client opens `GET /sse`, gets a
//! fresh session and an `endpoint` event naming where to post. Each
//! JSON-RPC message posted to `/message?sessionId=<id>` is answered with
//! `202 Accepted`; the response itself travels back on the event stream.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::{Stream, StreamExt, stream};
use parking_lot::{Mutex, RwLock};
use rmcp::ServerHandler;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::streamable::{cors_layer, health_check};
use super::{TransportError, TransportResult};
use crate::core::McpServer;
use crate::core::session::CallerContext;

/// Buffered responses per stream before posting handlers wait.
const CHANNEL_CAPACITY: usize = 32;

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Tool calls still running on one stream, keyed by JSON-RPC id.
///
/// Every call gets a child of the stream token, so closing the stream
/// cancels them all while `notifications/cancelled` cancels just one.
#[derive(Clone)]
struct InFlight {
    stream: CancellationToken,
    calls: Arc<Mutex<HashMap<String, CancellationToken>>>,
}

impl InFlight {
    fn new(stream: CancellationToken) -> Self {
        Self {
            stream,
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Token for a call starting now. Calls without an id cannot be
    /// cancelled individually.
    fn start(&self, id: Option<&Value>) -> CancellationToken {
        let ct = self.stream.child_token();
        if let Some(id) = id {
            self.calls.lock().insert(id.to_string(), ct.clone());
        }
        ct
    }

    fn finish(&self, id: Option<&Value>) {
        if let Some(id) = id {
            self.calls.lock().remove(&id.to_string());
        }
    }

    /// Cancel the call with this id. Returns whether one was running.
    fn cancel(&self, id: &Value) -> bool {
        let Some(ct) = self.calls.lock().remove(&id.to_string()) else {
            return false;
        };
        ct.cancel();
        true
    }

    fn cancel_all(&self) {
        self.stream.cancel();
    }
}

/// An open event stream.
#[derive(Clone)]
struct StreamHandle {
    sender: mpsc::Sender<String>,
    /// `Authorization` sent when the stream was opened.
    credential: String,
    calls: InFlight,
}

/// Application state shared across SSE handlers.
#[derive(Clone)]
struct AppState {
    server: McpServer,
    streams: Arc<RwLock<HashMap<String, StreamHandle>>>,
    ct: CancellationToken,
}

/// Removes a stream and its session once the client is gone.
struct StreamGuard {
    session_id: String,
    state: AppState,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.state.streams.write().remove(&self.session_id) {
            handle.calls.cancel_all();
        }
        self.state
            .server
            .tools()
            .sessions()
            .unregister(&self.session_id);
        debug!(session_id = %self.session_id, "SSE stream closed");
    }
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// SSE transport handler.
pub struct SseTransport {
    addr: String,
    enable_cors: bool,
}

impl SseTransport {
    pub fn new(addr: impl Into<String>, enable_cors: bool) -> Self {
        Self {
            addr: addr.into(),
            enable_cors,
        }
    }

    /// Routes served by this transport.
    pub fn router(server: McpServer, ct: CancellationToken, enable_cors: bool) -> Router {
        let state = AppState {
            server,
            streams: Arc::new(RwLock::new(HashMap::new())),
            ct,
        };

        let app = Router::new()
            .route("/sse", get(handle_sse))
            .route("/message", post(handle_message))
            .route("/health", get(health_check))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if enable_cors {
            app.layer(cors_layer())
        } else {
            app
        }
    }

    /// Serve until `ct` is cancelled.
    pub async fn run(self, server: McpServer, ct: CancellationToken) -> TransportResult<()> {
        let app = Self::router(server, ct.clone(), self.enable_cors);

        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| TransportError::bind(&self.addr, e))?;

        info!("Ready - SSE transport listening on {}", self.addr);
        info!("  → Stream:   GET /sse");
        info!("  → Messages: POST /message?sessionId=<id>");
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { ct.cancelled().await })
            .await
            .map_err(|e| TransportError::serve("SSE", e.to_string()))?;

        info!("SSE transport stopped");
        Ok(())
    }
}

/// Open an event stream for a new session.
#[instrument(skip_all)]
async fn handle_sse(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    let session_id = Uuid::new_v4().to_string();
    state
        .server
        .tools()
        .sessions()
        .register(&session_id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
    let stream_ct = state.ct.child_token();
    state.streams.write().insert(
        session_id.clone(),
        StreamHandle {
            sender,
            credential: authorization(&headers).to_string(),
            calls: InFlight::new(stream_ct.clone()),
        },
    );
    info!(session_id = %session_id, "SSE stream opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/message?sessionId={session_id}"));
    let guard = StreamGuard {
        session_id,
        state: state.clone(),
    };

    let messages = stream::unfold(
        (receiver, guard, stream_ct),
        |(mut receiver, guard, ct)| async move {
            let message = tokio::select! {
                _ = ct.cancelled() => None,
                message = receiver.recv() => message,
            }?;
            let event = Event::default().event("message").data(message);
            Some((Ok::<_, Infallible>(event), (receiver, guard, ct)))
        },
    );

    let events = stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages);
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Accept one JSON-RPC message for an open stream.
#[instrument(skip_all, fields(session_id, method))]
async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    let span = tracing::Span::current();
    span.record("session_id", query.session_id.as_str());
    span.record("method", request.method.as_str());

    let handle = state.streams.read().get(&query.session_id).cloned();
    let Some(handle) = handle else {
        warn!("Message for unknown SSE session");
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    let credential = match authorization(&headers) {
        "" => handle.credential.as_str(),
        credential => credential,
    };
    let caller = CallerContext::new(query.session_id, credential);

    tokio::spawn(async move {
        let Some(response) = process_request(&state.server, &caller, &handle.calls, request).await
        else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(message) => {
                if handle.sender.send(message).await.is_err() {
                    debug!(session_id = %caller.session_id, "SSE stream gone before response");
                }
            }
            Err(e) => warn!("Failed to encode JSON-RPC response: {}", e),
        }
    });

    StatusCode::ACCEPTED.into_response()
}

fn authorization(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default()
}

/// Process a JSON-RPC message. Notifications produce no response.
async fn process_request(
    server: &McpServer,
    caller: &CallerContext,
    calls: &InFlight,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.method == "notifications/cancelled" {
        handle_cancelled(calls, request.params);
        return None;
    }

    if request.method.starts_with("notifications/") {
        debug!("Received notification: {}", request.method);
        return None;
    }

    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, caller, calls, request).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    };
    Some(response)
}

fn handle_cancelled(calls: &InFlight, params: Option<Value>) {
    let Some(id) = params.as_ref().and_then(|p| p.get("requestId")) else {
        debug!("Cancellation without a request id");
        return;
    };
    if calls.cancel(id) {
        info!(request_id = %id, "Tool call cancelled by client");
    } else {
        debug!(request_id = %id, "Cancellation for a call no longer running");
    }
}

fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");
    match serde_json::to_value(server.get_info()) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    debug!("Processing tools/list request");
    let tools = server.tools().get_all_tools();
    JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

async fn handle_tools_call(
    server: &McpServer,
    caller: &CallerContext,
    calls: &InFlight,
    request: JsonRpcRequest,
) -> JsonRpcResponse {
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => serde_json::Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return JsonRpcResponse::invalid_params(request.id, "Tool arguments must be an object");
        }
    };

    let ct = calls.start(request.id.as_ref());
    let result = server
        .tools()
        .call_tool(name, arguments, caller, &ct)
        .await;
    calls.finish(request.id.as_ref());
    match serde_json::to_value(result) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}
