//! Tool Registry - central registration and dispatch for all tools.
//!
//! Every transport ends up here: the rmcp router for stdio and streamable
//! HTTP, and the SSE transport directly. A call resolves the caller's
//! session to a client view, then runs exactly one tool with it.

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::definitions::all_tools;
use super::error::ToolError;
use super::handlers::ToolHandler;
use crate::core::session::{CallerContext, SessionRegistry};

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
    sessions: Arc<SessionRegistry>,
}

impl ToolRegistry {
    /// Create a registry with every tool, backed by `sessions`.
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self::with_tools(sessions, all_tools())
    }

    pub fn with_tools(sessions: Arc<SessionRegistry>, tools: Vec<Arc<dyn ToolHandler>>) -> Self {
        Self { tools, sessions }
    }

    /// The session registry tool calls resolve against.
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.to_tool()).collect()
    }

    pub fn handlers(&self) -> &[Arc<dyn ToolHandler>] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Run the tool `name` for `caller`.
    ///
    /// Failures come back as error results. Cancelling `ct` abandons the
    /// backend round trip.
    #[instrument(skip_all, fields(tool = %name, session_id = %caller.session_id))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
        caller: &CallerContext,
        ct: &CancellationToken,
    ) -> CallToolResult {
        match self.dispatch(name, arguments, caller, ct).await {
            Ok(result) => {
                debug!("Tool call succeeded");
                result
            }
            Err(e) => {
                warn!("Tool call failed: {}", e);
                e.into_result()
            }
        }
    }

    async fn dispatch(
        &self,
        name: &str,
        arguments: JsonObject,
        caller: &CallerContext,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::not_found(name))?;
        let client = self
            .sessions
            .resolve(&caller.session_id, &caller.credential)?;

        tokio::select! {
            biased;
            _ = ct.cancelled() => Err(ToolError::Cancelled),
            result = tool.execute(&client, arguments) => result,
        }
    }
}
