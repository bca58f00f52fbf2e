//! Cluster endpoints.

use super::client::{ApiClient, SessionClient};
use super::error::{ApiError, ApiResult};
use super::models::{ClusterHardware, ClusterLicensing};

pub async fn get_cluster_hardware_by_id(
    client: &SessionClient,
    cluster_id: &str,
) -> ApiResult<ClusterHardware> {
    if cluster_id.is_empty() {
        return Err(ApiError::required("cluster_id"));
    }
    let path = ApiClient::expand_path("/v1/clusters/{cluster_id}/hardware", &[("cluster_id", cluster_id)]);
    client.get(&path, &[]).await
}

/// Licensing per node of the cluster. Nodes without a license are omitted
/// by the backend.
pub async fn get_cluster_licensing_by_id(
    client: &SessionClient,
    cluster_id: &str,
) -> ApiResult<ClusterLicensing> {
    if cluster_id.is_empty() {
        return Err(ApiError::required("cluster_id"));
    }
    let path = ApiClient::expand_path("/v1/clusters/{cluster_id}/licensing", &[("cluster_id", cluster_id)]);
    client.get(&path, &[]).await
}
