//! Core module containing shared infrastructure components.
//!
//! Configuration, the top-level error type, the per-session client
//! registry, the MCP server handler and the transports that feed it.

pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod transport;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use server::McpServer;
pub use session::SessionRegistry;
pub use transport::{TransportConfig, TransportService};
