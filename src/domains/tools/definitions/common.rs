//! Shared building blocks for the tool definitions.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::models::NodeInfo;
use crate::api::{SessionClient, healthcheck, nodes};
use crate::domains::tools::ToolError;

/// Append the resource hierarchy to a tool description.
macro_rules! with_hierarchy {
    ($text:literal) => {
        concat!(
            $text,
            "\n\nHierarchy: [Organization -> Datacenters -> Clusters -> Nodes -> Instances]"
        )
    };
}
pub(crate) use with_hierarchy;

/// Serialize `value` as pretty JSON text.
pub(crate) fn json_result<T: Serialize + ?Sized>(value: &T) -> Result<CallToolResult, ToolError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ToolError::Transport(format!("encoding response: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

pub(crate) fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// The node answering the backend healthcheck.
pub(crate) async fn current_node(client: &SessionClient) -> Result<NodeInfo, ToolError> {
    let health = healthcheck::run_healthcheck(client).await?;
    if !health.healthy {
        return Err(ToolError::invalid_argument("Node is not healthy"));
    }
    Ok(nodes::get_node_by_id(client, &health.id).await?)
}

/// Parameters for tools addressing one node.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeIdParams {
    /// Unique node id (format: node-<xxx>)
    pub node_id: String,
}

/// Parameters for tools addressing one cluster.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClusterIdParams {
    /// Unique cluster id (format: cls-<xxx>)
    pub cluster_id: String,
}

/// Parameters for tools addressing one organization.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrganizationIdParams {
    /// Unique organization id (format: org-<xxx>)
    pub organization_id: String,
}

/// Parameters for tools addressing one user.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UserIdParams {
    /// Unique user id (format: user-<xxx>)
    pub user_id: String,
}

/// Text of the first content item of a result.
#[cfg(test)]
pub(crate) fn result_text(result: &CallToolResult) -> String {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => text.text.clone(),
        _ => panic!("Expected text content"),
    }
}

/// Anonymous client view against a mock backend.
#[cfg(test)]
pub(crate) fn test_client(base_url: &str) -> SessionClient {
    let client = crate::api::ApiClient::new(&crate::api::ClientSettings::new(base_url)).unwrap();
    SessionClient::new(std::sync::Arc::new(client), None)
}

/// Arguments object from a JSON literal.
#[cfg(test)]
pub(crate) fn args(value: serde_json::Value) -> rmcp::model::JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}
