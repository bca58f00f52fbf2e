//! Organization endpoints.

use serde::Serialize;
use serde::de::IgnoredAny;

use super::client::{ApiClient, SessionClient};
use super::error::{ApiError, ApiResult};
use super::models::{CreatedOrganization, OrganizationDetail};

/// Request body for [`create_organization`].
#[derive(Debug, Clone, Serialize)]
pub struct NewOrganization<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'a str,
}

/// List every organization the caller can see.
pub async fn list_organizations(client: &SessionClient) -> ApiResult<Vec<OrganizationDetail>> {
    let organizations: Option<Vec<OrganizationDetail>> = client.get("/v1/organizations", &[]).await?;
    Ok(organizations.unwrap_or_default())
}

pub async fn get_organization_by_id(
    client: &SessionClient,
    organization_id: &str,
) -> ApiResult<OrganizationDetail> {
    if organization_id.is_empty() {
        return Err(ApiError::required("organization_id"));
    }
    let path = ApiClient::expand_path(
        "/v1/organizations/{organization_id}",
        &[("organization_id", organization_id)],
    );
    client.get(&path, &[]).await
}

pub async fn create_organization(
    client: &SessionClient,
    organization: &NewOrganization<'_>,
) -> ApiResult<CreatedOrganization> {
    if organization.name.is_empty() {
        return Err(ApiError::required("name"));
    }
    client.post("/v1/organizations", &[], organization).await
}

pub async fn delete_organization_by_id(client: &SessionClient, organization_id: &str) -> ApiResult<()> {
    if organization_id.is_empty() {
        return Err(ApiError::required("organization_id"));
    }
    let path = ApiClient::expand_path(
        "/v1/organizations/{organization_id}",
        &[("organization_id", organization_id)],
    );
    let _: IgnoredAny = client.delete(&path, &[]).await?;
    Ok(())
}
