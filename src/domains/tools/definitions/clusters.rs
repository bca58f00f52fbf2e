//! Cluster tools.

use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, JsonObject};

use super::common::{ClusterIdParams, json_result};
use crate::api::{SessionClient, clusters};
use crate::domains::tools::params::parse_params;
use crate::domains::tools::{ToolError, ToolHandler};

pub struct GetClusterHardwareTool;

impl GetClusterHardwareTool {
    pub const NAME: &'static str = "get_cluster_hardware_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for GetClusterHardwareTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Cluster Hardware By ID"
    }

    fn description(&self) -> &'static str {
        "Retrieve aggregated hardware information about all nodes in a specific cluster"
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<ClusterIdParams>()
    }

    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: ClusterIdParams = parse_params(arguments)?;
        let hardware = clusters::get_cluster_hardware_by_id(client, &params.cluster_id).await?;
        json_result(&hardware)
    }
}

pub struct GetClusterLicensingTool;

impl GetClusterLicensingTool {
    pub const NAME: &'static str = "get_cluster_licensing_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for GetClusterLicensingTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Cluster License By ID"
    }

    fn description(&self) -> &'static str {
        "Retrieve aggregated licensing information about all nodes in a specific cluster. Only \
         nodes that have licensing information will be included in the response. There is no \
         separate 'cluster license', licenses only exist for individual nodes."
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<ClusterIdParams>()
    }

    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: ClusterIdParams = parse_params(arguments)?;
        let licensing = clusters::get_cluster_licensing_by_id(client, &params.cluster_id).await?;
        json_result(&licensing)
    }
}
