//! User endpoints.

use serde::Serialize;
use serde::de::IgnoredAny;

use super::client::{ApiClient, SessionClient};
use super::error::{ApiError, ApiResult};
use super::models::UserSummary;

#[derive(Debug, Serialize)]
struct InvalidateSessions {
    invalidate_current: bool,
}

pub async fn list_users_in_organization(
    client: &SessionClient,
    organization_id: &str,
) -> ApiResult<Vec<UserSummary>> {
    if organization_id.is_empty() {
        return Err(ApiError::required("organization_id"));
    }
    let users: Option<Vec<UserSummary>> = client
        .get("/v1/users", &[("organization_id", organization_id)])
        .await?;
    Ok(users.unwrap_or_default())
}

pub async fn delete_user_by_id(client: &SessionClient, user_id: &str) -> ApiResult<()> {
    if user_id.is_empty() {
        return Err(ApiError::required("user_id"));
    }
    let path = ApiClient::expand_path("/v1/users/{user_id}", &[("user_id", user_id)]);
    let _: IgnoredAny = client.delete(&path, &[]).await?;
    Ok(())
}

/// Log the user out everywhere. `invalidate_current` also ends the session
/// making this request.
pub async fn invalidate_user_sessions_by_id(
    client: &SessionClient,
    user_id: &str,
    invalidate_current: bool,
) -> ApiResult<()> {
    if user_id.is_empty() {
        return Err(ApiError::required("user_id"));
    }
    let path = ApiClient::expand_path(
        "/v1/users/{user_id}/invalidate-sessions",
        &[("user_id", user_id)],
    );
    let body = InvalidateSessions { invalidate_current };
    let _: IgnoredAny = client.post(&path, &[], &body).await?;
    Ok(())
}
