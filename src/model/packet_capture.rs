use crate::framework::{ReconcileError, ResourceIdentifier, ResourceKind};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAXIMUM_BYTES_PER_PACKET: u64 = 0;
pub const DEFAULT_MAXIMUM_BYTES_PER_SESSION: u64 = 1_073_741_824;
pub const DEFAULT_MAXIMUM_CAPTURE_DURATION_IN_SECONDS: u64 = 18_000;

/// A packet capture session run by a network watcher.
///
/// Every field is fixed at creation. Changing any of them means deleting the
/// capture and starting a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketCapture {
    pub name: String,
    pub network_watcher_id: ResourceIdentifier,
    pub target_resource_id: String,
    pub maximum_bytes_per_packet: u64,
    pub maximum_bytes_per_session: u64,
    pub maximum_capture_duration_in_seconds: u64,
    pub storage_location: StorageLocation,
    pub filters: Vec<PacketCaptureFilter>,
}

/// Where captured packets are written. Exactly one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    StorageAccount {
        id: String,
        /// Blob URI assigned by the server; `None` until read back.
        storage_path: Option<String>,
    },
    LocalFile {
        path: String,
    },
}

impl StorageLocation {
    pub fn storage_account(id: impl Into<String>) -> Self {
        StorageLocation::StorageAccount {
            id: id.into(),
            storage_path: None,
        }
    }

    pub fn local_file(path: impl Into<String>) -> Self {
        StorageLocation::LocalFile { path: path.into() }
    }

    /// Builds the destination from its optional halves, as they arrive from
    /// configuration or from the wire.
    pub fn from_parts(
        storage_account_id: Option<String>,
        file_path: Option<String>,
        storage_path: Option<String>,
    ) -> Result<Self, ReconcileError> {
        match (storage_account_id, file_path) {
            (Some(id), None) => Ok(StorageLocation::StorageAccount { id, storage_path }),
            (None, Some(path)) => Ok(StorageLocation::LocalFile { path }),
            (Some(_), Some(_)) => Err(ReconcileError::ConflictingVariant {
                block: "storage_location",
                variants: vec!["storage_account_id", "file_path"],
            }),
            (None, None) => Err(ReconcileError::mapping(
                PacketCapture::TYPE_NAME,
                "storage_location: one of storage_account_id or file_path must be set",
            )),
        }
    }

    pub fn storage_path(&self) -> Option<&str> {
        match self {
            StorageLocation::StorageAccount { storage_path, .. } => storage_path.as_deref(),
            StorageLocation::LocalFile { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PacketCaptureFilter {
    pub protocol: Protocol,
    pub local_ip_address: Option<String>,
    pub local_port: Option<String>,
    pub remote_ip_address: Option<String>,
    pub remote_port: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Protocol {
    #[default]
    Any,
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketCaptureField {
    TargetResourceId,
    MaximumBytesPerPacket,
    MaximumBytesPerSession,
    MaximumCaptureDuration,
    StorageLocation,
    Filters,
}

impl PacketCapture {
    /// A capture with the server's default limits and no filters.
    pub fn new(
        network_watcher_id: ResourceIdentifier,
        name: impl Into<String>,
        target_resource_id: impl Into<String>,
        storage_location: StorageLocation,
    ) -> Self {
        Self {
            name: name.into(),
            network_watcher_id,
            target_resource_id: target_resource_id.into(),
            maximum_bytes_per_packet: DEFAULT_MAXIMUM_BYTES_PER_PACKET,
            maximum_bytes_per_session: DEFAULT_MAXIMUM_BYTES_PER_SESSION,
            maximum_capture_duration_in_seconds: DEFAULT_MAXIMUM_CAPTURE_DURATION_IN_SECONDS,
            storage_location,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: PacketCaptureFilter) -> Self {
        self.filters.push(filter);
        self
    }
}
