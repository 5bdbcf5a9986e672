use crate::model::Protocol;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct PacketCaptureResource {
    #[serde(default)]
    pub properties: Option<PacketCaptureProperties>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PacketCaptureProperties {
    pub target: String,
    #[serde(default)]
    pub bytes_to_capture_per_packet: Option<u64>,
    #[serde(default)]
    pub total_bytes_per_session: Option<u64>,
    #[serde(default)]
    pub time_limit_in_seconds: Option<u64>,
    #[serde(default)]
    pub storage_location: Option<WireStorageLocation>,
    #[serde(default)]
    pub filters: Vec<WireFilter>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireStorageLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireFilter {
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(rename = "localIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub local_ip_address: Option<String>,
    #[serde(rename = "localPort", default, skip_serializing_if = "Option::is_none")]
    pub local_port: Option<String>,
    #[serde(rename = "remoteIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub remote_ip_address: Option<String>,
    #[serde(rename = "remotePort", default, skip_serializing_if = "Option::is_none")]
    pub remote_port: Option<String>,
}
