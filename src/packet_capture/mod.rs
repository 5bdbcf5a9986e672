//! Network watcher packet capture resource logic.
//!
//! Captures cannot be changed once started; every field is
//! [`Mutability::ForceNew`]. Captures of one watcher share its
//! [`ParentKey`](crate::framework::ParentKey).

pub mod entity;
mod wire;

use crate::framework::identity::templates::{
    MICROSOFT_NETWORK, NETWORK_WATCHER, PROVIDERS, RESOURCE_GROUPS, RESOURCE_GROUP_NAME,
    SUBSCRIPTIONS, SUBSCRIPTION_ID,
};
use crate::framework::{Discipline, FieldSpec, IdTemplate, Mutability, Segment};
use crate::model::PacketCaptureField;

pub static PACKET_CAPTURE: IdTemplate = IdTemplate {
    kind: "Packet Capture",
    segments: &[
        SUBSCRIPTIONS,
        SUBSCRIPTION_ID,
        RESOURCE_GROUPS,
        RESOURCE_GROUP_NAME,
        PROVIDERS,
        MICROSOFT_NETWORK,
        Segment::Static {
            name: "staticNetworkWatchers",
            value: "networkWatchers",
        },
        Segment::UserSpecified {
            name: "networkWatcherName",
        },
        Segment::Static {
            name: "staticPacketCaptures",
            value: "packetCaptures",
        },
        Segment::UserSpecified {
            name: "packetCaptureName",
        },
    ],
    parent: Some(&NETWORK_WATCHER),
};

pub static FIELDS: [FieldSpec<PacketCaptureField>; 6] = [
    FieldSpec {
        field: PacketCaptureField::TargetResourceId,
        name: "target_resource_id",
        wire_path: "/properties/target",
        discipline: Discipline::Scalar,
        mutability: Mutability::ForceNew,
    },
    FieldSpec {
        field: PacketCaptureField::MaximumBytesPerPacket,
        name: "maximum_bytes_per_packet",
        wire_path: "/properties/bytesToCapturePerPacket",
        discipline: Discipline::Scalar,
        mutability: Mutability::ForceNew,
    },
    FieldSpec {
        field: PacketCaptureField::MaximumBytesPerSession,
        name: "maximum_bytes_per_session",
        wire_path: "/properties/totalBytesPerSession",
        discipline: Discipline::Scalar,
        mutability: Mutability::ForceNew,
    },
    FieldSpec {
        field: PacketCaptureField::MaximumCaptureDuration,
        name: "maximum_capture_duration_in_seconds",
        wire_path: "/properties/timeLimitInSeconds",
        discipline: Discipline::Scalar,
        mutability: Mutability::ForceNew,
    },
    FieldSpec {
        field: PacketCaptureField::StorageLocation,
        name: "storage_location",
        wire_path: "/properties/storageLocation",
        discipline: Discipline::Scalar,
        mutability: Mutability::ForceNew,
    },
    FieldSpec {
        field: PacketCaptureField::Filters,
        name: "filter",
        wire_path: "/properties/filters",
        discipline: Discipline::Ordered,
        mutability: Mutability::ForceNew,
    },
];
