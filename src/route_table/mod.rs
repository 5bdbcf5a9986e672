//! Virtual hub route table resource logic.
//!
//! Route tables are children of a virtual hub and are written through it, so
//! every mutation holds the hub's [`ParentKey`](crate::framework::ParentKey).

pub mod entity;
mod wire;

use crate::framework::identity::templates::{
    MICROSOFT_NETWORK, PROVIDERS, RESOURCE_GROUPS, RESOURCE_GROUP_NAME, SUBSCRIPTIONS,
    SUBSCRIPTION_ID, VIRTUAL_HUB,
};
use crate::framework::{Discipline, FieldSpec, IdTemplate, Mutability, Segment};
use crate::model::HubRouteTableField;

pub static HUB_ROUTE_TABLE: IdTemplate = IdTemplate {
    kind: "Hub Route Table",
    segments: &[
        SUBSCRIPTIONS,
        SUBSCRIPTION_ID,
        RESOURCE_GROUPS,
        RESOURCE_GROUP_NAME,
        PROVIDERS,
        MICROSOFT_NETWORK,
        Segment::Static {
            name: "staticVirtualHubs",
            value: "virtualHubs",
        },
        Segment::UserSpecified {
            name: "virtualHubName",
        },
        Segment::Static {
            name: "staticHubRouteTables",
            value: "hubRouteTables",
        },
        Segment::UserSpecified {
            name: "hubRouteTableName",
        },
    ],
    parent: Some(&VIRTUAL_HUB),
};

pub static FIELDS: [FieldSpec<HubRouteTableField>; 2] = [
    FieldSpec {
        field: HubRouteTableField::Labels,
        name: "labels",
        wire_path: "/properties/labels",
        discipline: Discipline::Set,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: HubRouteTableField::Routes,
        name: "route",
        wire_path: "/properties/routes",
        discipline: Discipline::Ordered,
        mutability: Mutability::Mutable,
    },
];
