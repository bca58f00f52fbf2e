//! Organization tools.

use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, JsonObject};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use super::common::{
    OrganizationIdParams, current_node, json_result, text_result, with_hierarchy,
};
use crate::api::organizations::{self, NewOrganization};
use crate::api::SessionClient;
use crate::domains::tools::params::{NoParams, parse_params};
use crate::domains::tools::{ToolError, ToolHandler};

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 64;
const DESCRIPTION_MAX_LEN: usize = 512;

pub struct ListOrganizationsTool;

impl ListOrganizationsTool {
    pub const NAME: &'static str = "list_organizations";
}

#[async_trait::async_trait]
impl ToolHandler for ListOrganizationsTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "List Organizations"
    }

    fn description(&self) -> &'static str {
        with_hierarchy!(
            "Retrieve a list of all organizations accessible to the user.\n\n\
             Organizations are the top-level entities within the Pextra CloudEnvironment (PCE) hierarchy. \
             They represent distinct tenants within the cloud, each with its own users, storage, \
             network configurations, and compute resources."
        )
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<NoParams>()
    }

    async fn execute(
        &self,
        client: &SessionClient,
        _arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let organizations = organizations::list_organizations(client).await?;
        info!(count = organizations.len(), "Listed organizations");
        json_result(&organizations)
    }
}

pub struct GetOrganizationByIdTool;

impl GetOrganizationByIdTool {
    pub const NAME: &'static str = "get_organization_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for GetOrganizationByIdTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Organization By ID"
    }

    fn description(&self) -> &'static str {
        "Retrieve detailed information about a specific organization. This includes the \
         datacenters, clusters, and nodes within the organization. Use this tool when asked for \
         a tree/hierarchical view of infrastructure, or when a list of nodes, clusters, or \
         datacenters is needed."
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<OrganizationIdParams>()
    }

    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: OrganizationIdParams = parse_params(arguments)?;
        let organization =
            organizations::get_organization_by_id(client, &params.organization_id).await?;
        json_result(&organization)
    }
}

/// Organization of the node answering the backend.
pub struct GetCurrentOrganizationTool;

impl GetCurrentOrganizationTool {
    pub const NAME: &'static str = "get_current_organization";
}

#[async_trait::async_trait]
impl ToolHandler for GetCurrentOrganizationTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Current Organization"
    }

    fn description(&self) -> &'static str {
        "Retrieve detailed information about the organization associated with the current node. \
         Use this tool when asked for a tree/hierarchical view of infrastructure for the current \
         organization."
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
        let organization_id = node.node.summary.organization_id;
        info!(%organization_id, "Resolved current organization");
        let organization = organizations::get_organization_by_id(client, &organization_id).await?;
        json_result(&organization)
    }
}

/// Parameters for [`CreateOrganizationTool`].
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateOrganizationParams {
    /// The name of the new organization: 3 to 64 characters from [a-zA-Z0-9_-].
    pub name: String,

    /// A brief description of the organization (at most 512 characters).
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateOrganizationParams {
    fn validate(&self) -> Result<(), ToolError> {
        let len = self.name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            return Err(ToolError::invalid_argument(format!(
                "name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"
            )));
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ToolError::invalid_argument(
                "name may only contain letters, digits, '_' and '-'",
            ));
        }
        let description_len = self.description.as_deref().map_or(0, |d| d.chars().count());
        if description_len > DESCRIPTION_MAX_LEN {
            return Err(ToolError::invalid_argument(format!(
                "description must be at most {DESCRIPTION_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}

pub struct CreateOrganizationTool;

impl CreateOrganizationTool {
    pub const NAME: &'static str = "create_organization";
}

#[async_trait::async_trait]
impl ToolHandler for CreateOrganizationTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Create Organization"
    }

    fn description(&self) -> &'static str {
        "Create a new organization within the Pextra CloudEnvironment (PCE). Organizations are \
         top-level entities that represent distinct tenants within the cloud."
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<CreateOrganizationParams>()
    }

    fn read_only(&self) -> bool {
        false
    }

    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: CreateOrganizationParams = parse_params(arguments)?;
        params.validate()?;

        let created = organizations::create_organization(
            client,
            &NewOrganization {
                name: &params.name,
                description: params.description.as_deref().unwrap_or_default(),
            },
        )
        .await?;
        info!(id = %created.id, name = %params.name, "Organization created");
        json_result(&created)
    }
}

/// Parameters for [`DeleteOrganizationByIdTool`].
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteOrganizationParams {
    /// Unique organization id (format: org-<xxx>)
    pub organization_id: String,

    /// A safety check to prevent accidental deletions. Must be set to true to proceed with deletion.
    pub are_you_sure: bool,
}

pub struct DeleteOrganizationByIdTool;

impl DeleteOrganizationByIdTool {
    pub const NAME: &'static str = "delete_organization_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for DeleteOrganizationByIdTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Delete Organization By ID"
    }

    fn description(&self) -> &'static str {
        "Delete an existing organization. The organization must be empty of any datacenters \
         (and consequently clusters and nodes) before it can be deleted."
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<DeleteOrganizationParams>()
    }

    fn read_only(&self) -> bool {
        false
    }

    fn destructive(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        client: &SessionClient,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let params: DeleteOrganizationParams = parse_params(arguments)?;
        if !params.are_you_sure {
            return Err(ToolError::invalid_argument(
                "Deletion not confirmed. Set 'are_you_sure' to true to proceed.",
            ));
        }

        organizations::delete_organization_by_id(client, &params.organization_id).await?;
        info!(organization_id = %params.organization_id, "Organization deleted");
        Ok(text_result(format!(
            "Organization {} deleted successfully.",
            params.organization_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::{args, result_text, test_client};
    use serde_json::json;

    #[tokio::test]
    async fn test_current_organization_follows_healthcheck() {
        let mut server = mockito::Server::new_async().await;
        let health = server
            .mock("GET", "/api/v1/healthcheck")
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"node-1","healthy":true}"#)
            .create_async()
            .await;
        let node = server
            .mock("GET", "/api/v1/nodes/node-1")
            .with_header("content-type", "application/json")
            .with_body(r#"{"node":{"id":"node-1","organization_id":"org-7"}}"#)
            .create_async()
            .await;
        let org = server
            .mock("GET", "/api/v1/organizations/org-7")
            .with_header("content-type", "application/json")
            .with_body(r#"{"organization":{"id":"org-7","name":"acme"}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = GetCurrentOrganizationTool
            .execute(&client, JsonObject::new())
            .await
            .unwrap();

        health.assert_async().await;
        node.assert_async().await;
        org.assert_async().await;
        let body: serde_json::Value = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(body["organization"]["name"], "acme");
    }

    #[tokio::test]
    async fn test_unhealthy_node() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/healthcheck")
            .with_body(r#"{"id":"node-1","healthy":false}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = GetCurrentOrganizationTool
            .execute(&client, JsonObject::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Node is not healthy");
    }

    #[tokio::test]
    async fn test_create_organization_sends_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/organizations")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(json!({ "name": "team_blue" })))
            .with_status(201)
            .with_body(r#"{"id":"org-9"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = CreateOrganizationTool
            .execute(&client, args(json!({ "name": "team_blue" })))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result_text(&result).contains("org-9"));
    }

    #[test]
    fn test_create_organization_validation() {
        let params = |name: &str, description: Option<String>| CreateOrganizationParams {
            name: name.to_string(),
            description,
        };

        assert!(params("ok-name_1", None).validate().is_ok());
        assert!(params("ab", None).validate().is_err());
        assert!(params(&"a".repeat(65), None).validate().is_err());
        assert!(params("bad name", None).validate().is_err());
        assert!(params("fine", Some("d".repeat(513))).validate().is_err());
        assert!(params("fine", Some("d".repeat(512))).validate().is_ok());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let client = test_client("http://127.0.0.1:9");
        let err = DeleteOrganizationByIdTool
            .execute(
                &client,
                args(json!({ "organization_id": "org-1", "are_you_sure": false })),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter: are_you_sure");
    }

    #[tokio::test]
    async fn test_delete_organization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/v1/organizations/org-1")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = DeleteOrganizationByIdTool
            .execute(
                &client,
                args(json!({ "organization_id": "org-1", "are_you_sure": true })),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result_text(&result), "Organization org-1 deleted successfully.");
    }
}
