//! Instance endpoints.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::client::{ApiClient, SessionClient};
use super::error::{ApiError, ApiResult};
use super::models::{InstanceSummary, PowerTask};

/// Power operations accepted by `POST /v1/instances/{instance_id}/power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    /// Power on.
    Start,
    /// Graceful shutdown. The guest may ignore it.
    Stop,
    /// Graceful reboot.
    Restart,
    /// Immediate power off.
    Kill,
}

impl PowerAction {
    pub const ALL: [PowerAction; 4] = [Self::Start, Self::Stop, Self::Restart, Self::Kill];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Kill => "kill",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerAction {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ApiError::invalid_argument(format!("invalid action: {s}")))
    }
}

/// Which part of the infrastructure to list instances for.
#[derive(Debug, Clone, Copy)]
pub enum InstanceScope<'a> {
    Node(&'a str),
    Cluster(&'a str),
}

impl InstanceScope<'_> {
    fn query(&self) -> ApiResult<(&'static str, &str)> {
        let (key, value) = match self {
            Self::Node(id) => ("node_id", *id),
            Self::Cluster(id) => ("cluster_id", *id),
        };
        if value.is_empty() {
            return Err(ApiError::required(key));
        }
        Ok((key, value))
    }
}

#[derive(Debug, Serialize)]
struct PowerRequest {
    action: PowerAction,
}

pub async fn list_instances(client: &SessionClient, scope: InstanceScope<'_>) -> ApiResult<Vec<InstanceSummary>> {
    let (key, value) = scope.query()?;
    let instances: Option<Vec<InstanceSummary>> = client.get("/v1/instances", &[(key, value)]).await?;
    Ok(instances.unwrap_or_default())
}

/// Start a power action. The backend answers with the id of the task
/// carrying it out.
pub async fn power_instance(
    client: &SessionClient,
    node_id: &str,
    instance_id: &str,
    action: PowerAction,
) -> ApiResult<PowerTask> {
    if node_id.is_empty() || instance_id.is_empty() {
        return Err(ApiError::invalid_argument("node_id and instance_id are required"));
    }
    let path = ApiClient::expand_path(
        "/v1/instances/{instance_id}/power",
        &[("instance_id", instance_id)],
    );
    client
        .post(&path, &[("node_id", node_id)], &PowerRequest { action })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_action_parse() {
        assert_eq!("kill".parse::<PowerAction>().unwrap(), PowerAction::Kill);
        assert!("reboot".parse::<PowerAction>().is_err());
    }

    #[test]
    fn test_power_action_serializes_lowercase() {
        let body = serde_json::to_value(PowerRequest { action: PowerAction::Restart }).unwrap();
        assert_eq!(body, serde_json::json!({ "action": "restart" }));
    }

    #[test]
    fn test_scope_requires_id() {
        let err = InstanceScope::Cluster("").query().unwrap_err();
        assert_eq!(err.to_string(), "cluster_id is required");
    }
}
