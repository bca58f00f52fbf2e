//! Instance tools.

use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::common::{ClusterIdParams, NodeIdParams, json_result, with_hierarchy};
use crate::api::instances::{self, InstanceScope, PowerAction};
use crate::api::models::InstanceSummary;
use crate::api::SessionClient;
use crate::domains::tools::params::parse_params;
use crate::domains::tools::{ToolError, ToolHandler};

#[derive(Debug, Serialize)]
struct InstanceList {
    instances: Vec<InstanceSummary>,
}

pub struct GetInstancesInNodeTool;

impl GetInstancesInNodeTool {
    pub const NAME: &'static str = "get_instances_in_node";
}

#[async_trait::async_trait]
impl ToolHandler for GetInstancesInNodeTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Instances In Node"
    }

    fn description(&self) -> &'static str {
        with_hierarchy!(
            "Retrieve all instances (virtual machines and containers) hosted on a specific node."
        )
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<NodeIdParams>()
    }

    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: NodeIdParams = parse_params(arguments)?;
        let instances =
            instances::list_instances(client, InstanceScope::Node(&params.node_id)).await?;
        json_result(&InstanceList { instances })
    }
}

pub struct GetInstancesInClusterTool;

impl GetInstancesInClusterTool {
    pub const NAME: &'static str = "get_instances_in_cluster";
}

#[async_trait::async_trait]
impl ToolHandler for GetInstancesInClusterTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Instances In Cluster"
    }

    fn description(&self) -> &'static str {
        with_hierarchy!(
            "Retrieve all instances (virtual machines and containers) across every node of a specific cluster."
        )
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
        let instances =
            instances::list_instances(client, InstanceScope::Cluster(&params.cluster_id)).await?;
        json_result(&InstanceList { instances })
    }
}

/// Parameters for [`PowerInstanceTool`].
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PowerInstanceParams {
    /// Unique node id (format: node-<xxx>) of the node hosting the instance
    pub node_id: String,

    /// Unique instance id (format: inst-<xxx>)
    pub instance_id: String,

    /// Power action to perform
    pub action: PowerAction,
}

#[derive(Debug, Serialize)]
struct PowerResponse {
    message: &'static str,
    task_id: String,
}

pub struct PowerInstanceTool;

impl PowerInstanceTool {
    pub const NAME: &'static str = "power_instance";
}

#[async_trait::async_trait]
impl ToolHandler for PowerInstanceTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Power Instance"
    }

    fn description(&self) -> &'static str {
        "Perform a power action on an instance. \
         `start` powers it on, `stop` and `restart` ask the guest to shut down or reboot, \
         `kill` powers it off immediately. Returns the id of the task carrying out the action."
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<PowerInstanceParams>()
    }

    fn read_only(&self) -> bool {
        false
    }

    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: PowerInstanceParams = parse_params(arguments)?;
        let task = instances::power_instance(
            client,
            &params.node_id,
            &params.instance_id,
            params.action,
        )
        .await?;
        info!(
            instance_id = %params.instance_id,
            action = %params.action,
            task_id = %task.task_id,
            "Power action started"
        );
        json_result(&PowerResponse {
            message: "Power action initiated successfully",
            task_id: task.task_id,
        })
    }
}
