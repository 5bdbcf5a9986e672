//! [`ResourceKind`] implementation for [`PacketCapture`].

use super::wire::{PacketCaptureProperties, PacketCaptureResource, WireFilter, WireStorageLocation};
use super::{FIELDS, PACKET_CAPTURE};
use crate::framework::mapper::{decode_wire, encode_wire};
use crate::framework::{
    FieldSpec, IdTemplate, ReconcileError, ResourceIdentifier, ResourceKind, WirePayload,
};
use crate::model::{
    PacketCapture, PacketCaptureField, PacketCaptureFilter, StorageLocation,
    DEFAULT_MAXIMUM_BYTES_PER_PACKET, DEFAULT_MAXIMUM_BYTES_PER_SESSION,
    DEFAULT_MAXIMUM_CAPTURE_DURATION_IN_SECONDS,
};

impl ResourceKind for PacketCapture {
    type Record = Self;
    type Field = PacketCaptureField;
    const TYPE_NAME: &'static str = "azurerm_network_packet_capture";

    fn template() -> &'static IdTemplate {
        &PACKET_CAPTURE
    }

    fn fields() -> &'static [FieldSpec<PacketCaptureField>] {
        &FIELDS
    }

    fn identifier(record: &Self) -> Result<ResourceIdentifier, ReconcileError> {
        record.network_watcher_id.child(&PACKET_CAPTURE, &[record.name.as_str()])
    }

    fn encode(record: &Self) -> Result<WirePayload, ReconcileError> {
        // storagePath is server-assigned and never sent.
        let storage_location = match &record.storage_location {
            StorageLocation::StorageAccount { id, .. } => WireStorageLocation {
                storage_id: Some(id.clone()),
                ..Default::default()
            },
            StorageLocation::LocalFile { path } => WireStorageLocation {
                file_path: Some(path.clone()),
                ..Default::default()
            },
        };

        let wire = PacketCaptureResource {
            properties: Some(PacketCaptureProperties {
                target: record.target_resource_id.clone(),
                bytes_to_capture_per_packet: Some(record.maximum_bytes_per_packet),
                total_bytes_per_session: Some(record.maximum_bytes_per_session),
                time_limit_in_seconds: Some(record.maximum_capture_duration_in_seconds),
                storage_location: Some(storage_location),
                filters: record
                    .filters
                    .iter()
                    .map(|filter| WireFilter {
                        protocol: filter.protocol,
                        local_ip_address: filter.local_ip_address.clone(),
                        local_port: filter.local_port.clone(),
                        remote_ip_address: filter.remote_ip_address.clone(),
                        remote_port: filter.remote_port.clone(),
                    })
                    .collect(),
            }),
        };
        encode_wire(Self::TYPE_NAME, &wire)
    }

    fn decode(id: &ResourceIdentifier, payload: &WirePayload) -> Result<Self, ReconcileError> {
        let wire: PacketCaptureResource = decode_wire(Self::TYPE_NAME, payload)?;
        let properties = wire.properties.ok_or_else(|| ReconcileError::RetrievalFailed {
            id: id.to_string(),
            what: "model.Properties",
        })?;
        let network_watcher_id = id.parent_id().ok_or_else(|| {
            ReconcileError::mapping(Self::TYPE_NAME, format!("{id} has no network watcher"))
        })?;

        let location = properties.storage_location.unwrap_or_default();
        let storage_location =
            StorageLocation::from_parts(location.storage_id, location.file_path, location.storage_path)?;

        Ok(PacketCapture {
            name: id.name().to_string(),
            network_watcher_id,
            target_resource_id: properties.target,
            maximum_bytes_per_packet: properties
                .bytes_to_capture_per_packet
                .unwrap_or(DEFAULT_MAXIMUM_BYTES_PER_PACKET),
            maximum_bytes_per_session: properties
                .total_bytes_per_session
                .unwrap_or(DEFAULT_MAXIMUM_BYTES_PER_SESSION),
            maximum_capture_duration_in_seconds: properties
                .time_limit_in_seconds
                .unwrap_or(DEFAULT_MAXIMUM_CAPTURE_DURATION_IN_SECONDS),
            storage_location,
            filters: properties
                .filters
                .into_iter()
                .map(|filter| PacketCaptureFilter {
                    protocol: filter.protocol,
                    local_ip_address: filter.local_ip_address,
                    local_port: filter.local_port,
                    remote_ip_address: filter.remote_ip_address,
                    remote_port: filter.remote_port,
                })
                .collect(),
        })
    }
}
