//! Image endpoints.

use super::client::{ApiClient, SessionClient};
use super::error::{ApiError, ApiResult};
use super::models::Image;

/// Images available for deployment on a node.
pub async fn list_images_by_node(client: &SessionClient, node_id: &str) -> ApiResult<Vec<Image>> {
    if node_id.is_empty() {
        return Err(ApiError::required("node_id"));
    }
    let path = ApiClient::expand_path("/v1/nodes/{node_id}/images/images", &[("node_id", node_id)]);
    let images: Option<Vec<Image>> = client.get(&path, &[]).await?;
    Ok(images.unwrap_or_default())
}
