//! Tool definitions.
//!
//! One file per backend area. [`all_tools`] is the catalog exposed to clients.

mod common;
pub mod clusters;
pub mod images;
pub mod instances;
pub mod nodes;
pub mod organizations;
pub mod users;

use std::sync::Arc;

use super::ToolHandler;

pub use clusters::{GetClusterHardwareTool, GetClusterLicensingTool};
pub use images::GetImagesTool;
pub use instances::{GetInstancesInClusterTool, GetInstancesInNodeTool, PowerInstanceTool};
pub use nodes::{
    GetCurrentNodeTool, GetNodeByIdTool, GetNodeHardwareTool, GetNodeLicenseTool,
    GetNodePciDevicesTool, GetNodeStoragePoolsTool,
};
pub use organizations::{
    CreateOrganizationTool, DeleteOrganizationByIdTool, GetCurrentOrganizationTool,
    GetOrganizationByIdTool, ListOrganizationsTool,
};
pub use users::{DeleteUserByIdTool, InvalidateUserSessionsTool, ListUsersInOrganizationTool};

/// Every tool, in listing order.
pub fn all_tools() -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ListOrganizationsTool),
        Arc::new(GetOrganizationByIdTool),
        Arc::new(GetCurrentOrganizationTool),
        Arc::new(CreateOrganizationTool),
        Arc::new(DeleteOrganizationByIdTool),
        Arc::new(ListUsersInOrganizationTool),
        Arc::new(InvalidateUserSessionsTool),
        Arc::new(DeleteUserByIdTool),
        Arc::new(GetClusterHardwareTool),
        Arc::new(GetClusterLicensingTool),
        Arc::new(GetNodeByIdTool),
        Arc::new(GetCurrentNodeTool),
        Arc::new(GetNodeHardwareTool),
        Arc::new(GetNodeLicenseTool),
        Arc::new(GetNodeStoragePoolsTool),
        Arc::new(GetNodePciDevicesTool),
        Arc::new(GetImagesTool),
        Arc::new(GetInstancesInNodeTool),
        Arc::new(GetInstancesInClusterTool),
        Arc::new(PowerInstanceTool),
    ]
}
