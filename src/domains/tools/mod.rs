//! Tools domain module.
//!
//! Every PCE operation exposed to MCP clients is a tool. Calls from all
//! transports end in [`ToolRegistry::call_tool`], which resolves the
//! caller's session before running the tool.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, one file per backend area
//! - `router.rs` - rmcp ToolRouter built from the registry (stdio, streamable HTTP)
//! - `registry.rs` - Central tool registry and dispatch
//! - `params.rs` - Argument decoding against each tool's schema
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Add a unit struct implementing [`ToolHandler`] in `definitions/`
//! 2. List it in `definitions::all_tools()`
//!
//! The router and the SSE dispatcher pick it up from the registry.

pub mod definitions;
mod error;
mod handlers;
pub mod params;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::ToolHandler;
pub use registry::ToolRegistry;
pub use router::{CallerResolver, build_tool_router};
