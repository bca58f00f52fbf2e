//! Image tools.

use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, JsonObject};
use serde::Serialize;

use super::common::{NodeIdParams, json_result};
use crate::api::models::Image;
use crate::api::{SessionClient, images};
use crate::domains::tools::params::parse_params;
use crate::domains::tools::{ToolError, ToolHandler};

#[derive(Debug, Serialize)]
struct ImageList {
    images: Vec<Image>,
}

pub struct GetImagesTool;

impl GetImagesTool {
    pub const NAME: &'static str = "get_images";
}

#[async_trait::async_trait]
impl ToolHandler for GetImagesTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn title(&self) -> &'static str {
        "Get Images"
    }

    fn description(&self) -> &'static str {
        "Retrieve images for instance deployment on a specific node"
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
        let images = images::list_images_by_node(client, &params.node_id).await?;
        json_result(&ImageList { images })
    }
}
