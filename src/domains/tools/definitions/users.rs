//! User tools.

use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::common::{OrganizationIdParams, UserIdParams, json_result, text_result};
use crate::api::models::UserSummary;
use crate::api::{SessionClient, users};
use crate::domains::tools::params::parse_params;
use crate::domains::tools::{ToolError, ToolHandler};

#[derive(Debug, Serialize)]
struct UserList {
    users: Vec<UserSummary>,
}

pub struct ListUsersInOrganizationTool;

impl ListUsersInOrganizationTool {
    pub const NAME: &'static str = "list_users_in_organization_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for ListUsersInOrganizationTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "List Users In Organization By ID"
    }

    fn description(&self) -> &'static str {
        "List all users in a specific organization by its ID"
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
        let users = users::list_users_in_organization(client, &params.organization_id).await?;
        json_result(&UserList { users })
    }
}

/// Parameters for [`InvalidateUserSessionsTool`].
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InvalidateUserSessionsParams {
    /// Unique user id (format: user-<xxx>)
    pub user_id: String,

    /// Also end the session used to make this request.
    #[serde(default)]
    pub invalidate_current: bool,
}

pub struct InvalidateUserSessionsTool;

impl InvalidateUserSessionsTool {
    pub const NAME: &'static str = "invalidate_user_sessions_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for InvalidateUserSessionsTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Invalidate User Sessions By ID"
    }

    fn description(&self) -> &'static str {
        "Invalidate all sessions for a specific user by its ID"
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<InvalidateUserSessionsParams>()
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
        let params: InvalidateUserSessionsParams = parse_params(arguments)?;
        users::invalidate_user_sessions_by_id(client, &params.user_id, params.invalidate_current)
            .await?;
        info!(user_id = %params.user_id, "User sessions invalidated");
        Ok(text_result("User sessions invalidated successfully"))
    }
}

pub struct DeleteUserByIdTool;

impl DeleteUserByIdTool {
    pub const NAME: &'static str = "delete_user_by_id";
}

#[async_trait::async_trait]
impl ToolHandler for DeleteUserByIdTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Delete User By ID"
    }

    fn description(&self) -> &'static str {
        "Delete a user by its ID"
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<UserIdParams>()
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
        let params: UserIdParams = parse_params(arguments)?;
        users::delete_user_by_id(client, &params.user_id).await?;
        info!(user_id = %params.user_id, "User deleted");
        Ok(text_result("User deleted successfully"))
    }
}
