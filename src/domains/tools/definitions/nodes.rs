//! Node tools.

use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::common::{NodeIdParams, current_node, json_result, with_hierarchy};
use crate::api::models::{PciDevice, StoragePool};
use crate::api::{SessionClient, nodes};
use crate::domains::tools::params::{NoParams, parse_params};
use crate::domains::tools::{ToolError, ToolHandler};

pub struct GetNodeByIdTool;

impl GetNodeByIdTool {
    pub const NAME: &'static str = "get_node_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for GetNodeByIdTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Node By ID"
    }

    fn description(&self) -> &'static str {
        with_hierarchy!(
            "Retrieve detailed information about a specific node.\n\n\
             Nodes are servers that provide the compute resources within Pextra CloudEnvironment \
             (PCE). They are organized in clusters, and host instances (virtual machines or \
             containers) that run workloads."
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
        let node = nodes::get_node_by_id(client, &params.node_id).await?;
        json_result(&node)
    }
}

/// The node answering the backend, found through its healthcheck.
pub struct GetCurrentNodeTool;

impl GetCurrentNodeTool {
    pub const NAME: &'static str = "get_current_node";
}

#[async_trait::async_trait]
impl ToolHandler for GetCurrentNodeTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Current Node"
    }

    fn description(&self) -> &'static str {
        "Retrieve detailed information about the current node"
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<NoParams>()
    }

    async fn execute(
        &self,
        client: &SessionClient,
        _arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let node = current_node(client).await?;
        debug!(node_id = %node.node.summary.id, "Resolved current node");
        json_result(&node)
    }
}

pub struct GetNodeHardwareTool;

impl GetNodeHardwareTool {
    pub const NAME: &'static str = "get_node_hardware_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for GetNodeHardwareTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Node Hardware By ID"
    }

    fn description(&self) -> &'static str {
        "Retrieve detailed hardware information (CPU, memory, disks, USB devices) about a specific node."
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
        let hardware = nodes::get_node_hardware_by_id(client, &params.node_id).await?;
        json_result(&hardware)
    }
}

/// Parameters for [`GetNodeLicenseTool`].
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeLicenseParams {
    /// Unique node id (format: node-<xxx>)
    pub node_id: String,

    /// Whether to include the license key in the response. This may expose sensitive information.
    #[serde(default)]
    pub include_key: bool,
}

pub struct GetNodeLicenseTool;

impl GetNodeLicenseTool {
    pub const NAME: &'static str = "get_node_license_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for GetNodeLicenseTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Node License By ID"
    }

    fn description(&self) -> &'static str {
        "Retrieve license information about a specific node."
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<NodeLicenseParams>()
    }

    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: NodeLicenseParams = parse_params(arguments)?;
        let mut license = nodes::get_node_license_by_id(client, &params.node_id).await?;
        if params.include_key {
            info!(node_id = %params.node_id, "License key included on request");
        } else {
            license.redact();
        }
        json_result(&license)
    }
}

#[derive(Debug, Serialize)]
struct StoragePoolList {
    pools: Vec<StoragePool>,
}

pub struct GetNodeStoragePoolsTool;

impl GetNodeStoragePoolsTool {
    pub const NAME: &'static str = "get_node_storagepools_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for GetNodeStoragePoolsTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Node Storage Pools By ID"
    }

    fn description(&self) -> &'static str {
        "Retrieve storage pool information for a specific node."
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
        let pools = nodes::get_node_storage_pools_by_id(client, &params.node_id).await?;
        json_result(&StoragePoolList { pools })
    }
}

#[derive(Debug, Serialize)]
struct PciDeviceList {
    devices: Vec<PciDevice>,
}

pub struct GetNodePciDevicesTool;

impl GetNodePciDevicesTool {
    pub const NAME: &'static str = "get_node_pcidevices_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for GetNodePciDevicesTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Node PCI Devices By ID"
    }

    fn description(&self) -> &'static str {
        "Retrieve PCI device information for a specific node."
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
        let devices = nodes::get_node_pci_devices_by_id(client, &params.node_id).await?;
        json_result(&PciDeviceList { devices })
    }
}
