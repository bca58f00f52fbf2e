//! Transport layer for the MCP server.
//!
//! Three transports, any combination of which may run at once:
//! - **STDIO**: one client on stdin/stdout, fixed session id
//! - **SSE**: `GET /sse` event stream plus `POST /message`, one session per stream
//! - **Streamable HTTP**: rmcp's streamable HTTP service at `/mcp`, sessions keyed by `Mcp-Session-Id`
//!
//! Each transport identifies the caller of a request and delegates tool
//! calls to the shared tool registry.

pub mod config;
mod error;
mod service;
pub mod sse;
pub mod stdio;
pub mod streamable;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::{TransportService, shutdown_signal};
