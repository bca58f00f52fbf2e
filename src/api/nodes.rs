//! Node endpoints.

use super::client::{ApiClient, SessionClient};
use super::error::{ApiError, ApiResult};
use super::models::{NodeHardware, NodeInfo, NodeLicense, PciDevice, StoragePool};

fn node_path(template: &str, node_id: &str) -> ApiResult<String> {
    if node_id.is_empty() {
        return Err(ApiError::required("node_id"));
    }
    Ok(ApiClient::expand_path(template, &[("node_id", node_id)]))
}

pub async fn get_node_by_id(client: &SessionClient, node_id: &str) -> ApiResult<NodeInfo> {
    let path = node_path("/v1/nodes/{node_id}", node_id)?;
    client.get(&path, &[]).await
}

pub async fn get_node_hardware_by_id(client: &SessionClient, node_id: &str) -> ApiResult<NodeHardware> {
    let path = node_path("/v1/nodes/{node_id}/hardware", node_id)?;
    client.get(&path, &[]).await
}

/// License of a node, key included. Callers decide whether to redact it.
pub async fn get_node_license_by_id(client: &SessionClient, node_id: &str) -> ApiResult<NodeLicense> {
    let path = node_path("/v1/nodes/{node_id}/license", node_id)?;
    client.get(&path, &[]).await
}

pub async fn get_node_storage_pools_by_id(
    client: &SessionClient,
    node_id: &str,
) -> ApiResult<Vec<StoragePool>> {
    let path = node_path("/v1/nodes/{node_id}/storage/pools", node_id)?;
    let pools: Option<Vec<StoragePool>> = client.get(&path, &[]).await?;
    Ok(pools.unwrap_or_default())
}

pub async fn get_node_pci_devices_by_id(client: &SessionClient, node_id: &str) -> ApiResult<Vec<PciDevice>> {
    let path = node_path("/v1/nodes/{node_id}/hardware/pci", node_id)?;
    let devices: Option<Vec<PciDevice>> = client.get(&path, &[]).await?;
    Ok(devices.unwrap_or_default())
}
