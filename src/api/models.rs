//! Response models returned by the backend.
//!
//! Every struct defaults missing fields so that older backends with fewer
//! fields still decode. Fields that carry backend-specific enumerations are
//! kept as raw JSON values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Organizations
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub creation: String,
    pub description: String,
}

/// An organization together with the infrastructure it owns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationDetail {
    pub organization: Organization,
    pub datacenters: Vec<DatacenterSummary>,
    pub clusters: Vec<ClusterSummary>,
    pub nodes: Vec<NodeSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrganization {
    pub id: String,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSummary {
    pub id: String,
    pub organization_id: String,
    pub username: String,
    pub enabled: bool,
    pub locked: bool,
    pub expiry: String,
    pub expired: bool,
    pub mfa_enabled: bool,
    pub is_root: bool,
    pub linux_user: String,
    pub description: String,
    pub creation: String,
}

// ============================================================================
// Datacenters and clusters
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatacenterSummary {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub location: Location,
    pub creation: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSummary {
    pub id: String,
    pub organization_id: String,
    pub datacenter_id: String,
    pub name: String,
    pub creation: String,
    pub description: String,
    pub node_count: i64,
    pub fault_tolerance: i64,
    pub standalone: bool,
    pub leader_id: String,
    pub has_leader: bool,
}

/// Hardware totals across all nodes of a cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterHardware {
    /// Set when some nodes did not report.
    pub partial: bool,
    pub vcpus: i64,
    pub memory_gb: i64,
    pub storage_gb: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterLicenseStatus {
    pub status: String,
    pub next_expiry: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLicenseStatus {
    pub ok: bool,
    pub expiry: String,
}

/// Licensing overview of a cluster, keyed by node id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterLicensing {
    pub cluster: ClusterLicenseStatus,
    pub nodes: HashMap<String, NodeLicenseStatus>,
}

// ============================================================================
// Nodes
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSummary {
    pub id: String,
    pub organization_id: String,
    pub cluster_id: String,
    pub name: String,
    pub description: String,
    pub ip_address: String,
    pub wol_mac: String,
    pub creation: String,
    pub alive: bool,
    pub last_seen: String,
    pub joining: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDetail {
    #[serde(flatten)]
    pub summary: NodeSummary,
    pub ssh_key: String,
    pub client_cert: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeOs {
    pub kernel: String,
    pub architecture: String,
    pub uefi: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeTime {
    pub time: i64,
    pub timezone: String,
    pub uptime: i64,
}

/// Full view of a node as returned by `GET /v1/nodes/{node_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub node: NodeDetail,
    pub instances: Vec<InstanceSummary>,
    pub hostname: String,
    pub os: NodeOs,
    pub time: NodeTime,
    pub pce_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuSpeed {
    pub current: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuCores {
    pub physical: i64,
    pub performance: i64,
    pub efficiency: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeCpu {
    pub manufacturer: String,
    pub brand: String,
    pub speed: CpuSpeed,
    pub governor: String,
    pub cores: CpuCores,
    pub processors: i64,
    pub sockets: i64,
    pub flags: Vec<String>,
    pub virtualization: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Voltage {
    pub current: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryModule {
    pub size: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub ecc: bool,
    pub voltage: Voltage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryBank {
    pub bank: i64,
    pub empty: bool,
    pub data: MemoryModule,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Disk {
    pub device: String,
    pub name: String,
    pub size: f64,
    pub serial: String,
    pub interface: String,
    pub smart_status: String,
    pub vendor: String,
    pub temperature: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbDevice {
    pub bus: i64,
    pub device: i64,
    pub vendor_id: String,
    pub product_id: String,
    pub vendor: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub removable: bool,
    pub max_power: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeHardware {
    pub vcpus: i64,
    pub cpu: NodeCpu,
    pub memory: Vec<MemoryBank>,
    pub disks: Vec<Disk>,
    pub usb: Vec<UsbDevice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLicense {
    pub key: String,
    pub expiry: String,
    pub valid: bool,
}

impl NodeLicense {
    /// Placeholder that replaces a license key the caller did not ask for.
    pub const REDACTED: &'static str = "REDACTED";

    /// Hide the license key.
    pub fn redact(&mut self) {
        self.key = Self::REDACTED.to_string();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePoolUsage {
    pub capacity: f64,
    pub allocated: f64,
    pub available: f64,
    pub percent_used: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePool {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Value,
    pub name: String,
    pub initialized: bool,
    pub available: bool,
    pub can_hold_images: bool,
    pub usage: StoragePoolUsage,
    pub volume_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PciDevice {
    pub slot: String,
    pub class: String,
    pub vendor: String,
    pub device: String,
    pub revision: String,
    pub prog_if: String,
    pub iommu_group: String,
    pub marked_for_passthrough: bool,
}

/// Result of the backend healthcheck, identifying the node that answered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Healthcheck {
    pub id: String,
    pub cluster_id_hash: String,
    pub healthy: bool,
    pub time: i64,
}

// ============================================================================
// Instances and images
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceCpu {
    pub sockets: i64,
    pub cores: i64,
    pub threads: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSummary {
    pub id: String,
    pub node_id: String,
    #[serde(rename = "type")]
    pub kind: Value,
    pub name: String,
    pub cpu: InstanceCpu,
    pub vcpus: i64,
    pub memory: i64,
    pub creation: String,
    pub autostart: bool,
    pub boot_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerTask {
    pub task_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub name: String,
    /// Size in MB.
    pub size: i64,
    pub creation: String,
    #[serde(rename = "type")]
    pub kind: Value,
    pub storage_pool_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_info_flattens_detail() {
        let info: NodeInfo = serde_json::from_value(serde_json::json!({
            "node": {
                "id": "node-1",
                "organization_id": "org-1",
                "alive": true,
                "ssh_key": "ssh-ed25519 AAAA"
            },
            "hostname": "pce-01",
            "pce_version": "1.4.0"
        }))
        .unwrap();

        assert_eq!(info.node.summary.id, "node-1");
        assert_eq!(info.node.summary.organization_id, "org-1");
        assert!(info.node.summary.alive);
        assert_eq!(info.node.ssh_key, "ssh-ed25519 AAAA");
        assert!(info.instances.is_empty());
    }

    #[test]
    fn test_license_redaction() {
        let mut license = NodeLicense {
            key: "AAAA-BBBB".into(),
            expiry: "2030-01-01".into(),
            valid: true,
        };
        license.redact();
        assert_eq!(license.key, NodeLicense::REDACTED);
        assert!(license.valid);
    }

    #[test]
    fn test_instance_type_kept_as_raw_value() {
        let instance: InstanceSummary =
            serde_json::from_str(r#"{"id":"inst-1","type":1,"name":"web"}"#).unwrap();
        assert_eq!(instance.kind, serde_json::json!(1));

        let out = serde_json::to_value(&instance).unwrap();
        assert_eq!(out["type"], 1);
    }
}
