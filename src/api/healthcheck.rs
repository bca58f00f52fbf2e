//! Healthcheck endpoint.

use super::client::SessionClient;
use super::error::ApiResult;
use super::models::Healthcheck;

/// Ask the backend which node is answering and whether it is healthy.
pub async fn run_healthcheck(client: &SessionClient) -> ApiResult<Healthcheck> {
    client.get("/v1/healthcheck", &[]).await
}
