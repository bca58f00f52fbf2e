//! MCP server handler.
//!
//! One [`McpServer`] value backs each rmcp service: the stdio stream, and
//! every streamable HTTP session. Tool calls are routed through the shared
//! [`ToolRegistry`], so all transports see the same session registry.

use std::sync::Arc;

use rmcp::{
    RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};

use super::config::AppConfig;
use super::session::{CallerContext, CallerSource};
use crate::domains::tools::{CallerResolver, ToolRegistry, build_tool_router};

/// Instructions advertised on `initialize`.
pub const INSTRUCTIONS: &str = "Tools for managing a Pextra CloudEnvironment (PCE) deployment: \
    organizations, users, clusters, nodes, images and instances. \
    Hierarchy: [Organization -> Datacenters -> Clusters -> Nodes -> Instances]";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<AppConfig>,

    /// Tools and the session registry they resolve against.
    tools: Arc<ToolRegistry>,

    /// How callers are identified.
    source: CallerSource,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(config: Arc<AppConfig>, tools: Arc<ToolRegistry>, source: CallerSource) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(tools.clone()),
            config,
            tools,
            source,
        }
    }

    /// Server for the stdio stream, using the configured stdio credential.
    pub fn stdio(config: Arc<AppConfig>, tools: Arc<ToolRegistry>) -> Self {
        let source = CallerSource::Stdio {
            credential: config.stdio_credential().to_string(),
        };
        Self::new(config, tools, source)
    }

    /// Server for HTTP requests, identifying callers from headers.
    pub fn http(config: Arc<AppConfig>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(config, tools, CallerSource::Http)
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }
}

impl CallerResolver for McpServer {
    fn caller(&self, request: &RequestContext<RoleServer>) -> CallerContext {
        self.source.caller(&request.extensions)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
