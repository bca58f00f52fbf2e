//! The trait every tool implements.

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool, ToolAnnotations};

use super::error::ToolError;
use crate::api::SessionClient;

/// One tool: its metadata plus the call it makes against the backend.
///
/// Handlers are stateless. The per-request [`SessionClient`] already carries
/// the caller's credential.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name as registered in MCP.
    fn name(&self) -> &'static str;

    /// Human readable title.
    fn title(&self) -> &'static str;

    /// Description shown to clients.
    fn description(&self) -> &'static str;

    /// JSON schema of the parameters.
    fn input_schema(&self) -> Arc<JsonObject>;

    /// Whether the tool only reads.
    fn read_only(&self) -> bool {
        true
    }

    /// Whether the tool may destroy data.
    fn destructive(&self) -> bool {
        false
    }

    /// Run the tool with raw arguments.
    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError>;

    /// Tool model listed to clients.
    fn to_tool(&self) -> Tool {
        Tool {
            name: self.name().into(),
            description: Some(self.description().into()),
            input_schema: self.input_schema(),
            annotations: Some(ToolAnnotations {
                title: Some(self.title().to_string()),
                read_only_hint: Some(self.read_only()),
                destructive_hint: Some(self.destructive()),
                idempotent_hint: None,
                open_world_hint: Some(true),
            }),
            output_schema: None,
            icons: None,
            meta: None,
            title: Some(self.title().to_string()),
        }
    }
}
