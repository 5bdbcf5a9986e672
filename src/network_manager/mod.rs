//! Network manager resource logic.
//!
//! A network manager is a top-level resource: it is its own lock container,
//! and its children (network groups, configurations) share its key.
//!
//! The two scope lists are separate fields so that an update to one never
//! rewrites the server-assigned `crossTenantScopes` sitting next to them.

pub mod entity;
mod wire;

use crate::framework::identity::templates::{
    MICROSOFT_NETWORK, PROVIDERS, RESOURCE_GROUPS, RESOURCE_GROUP_NAME, SUBSCRIPTIONS,
    SUBSCRIPTION_ID,
};
use crate::framework::{Discipline, FieldSpec, IdTemplate, Mutability, Segment};
use crate::model::NetworkManagerField;

pub static NETWORK_MANAGER: IdTemplate = IdTemplate {
    kind: "Network Manager",
    segments: &[
        SUBSCRIPTIONS,
        SUBSCRIPTION_ID,
        RESOURCE_GROUPS,
        RESOURCE_GROUP_NAME,
        PROVIDERS,
        MICROSOFT_NETWORK,
        Segment::Static {
            name: "staticNetworkManagers",
            value: "networkManagers",
        },
        Segment::UserSpecified {
            name: "networkManagerName",
        },
    ],
    parent: None,
};

pub static FIELDS: [FieldSpec<NetworkManagerField>; 6] = [
    FieldSpec {
        field: NetworkManagerField::Location,
        name: "location",
        wire_path: "/location",
        discipline: Discipline::Scalar,
        mutability: Mutability::ForceNew,
    },
    FieldSpec {
        field: NetworkManagerField::Description,
        name: "description",
        wire_path: "/properties/description",
        discipline: Discipline::Scalar,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: NetworkManagerField::ManagementGroupIds,
        name: "scope.management_group_ids",
        wire_path: "/properties/networkManagerScopes/managementGroups",
        discipline: Discipline::Set,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: NetworkManagerField::SubscriptionIds,
        name: "scope.subscription_ids",
        wire_path: "/properties/networkManagerScopes/subscriptions",
        discipline: Discipline::Set,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: NetworkManagerField::ScopeAccesses,
        name: "scope_accesses",
        wire_path: "/properties/networkManagerScopeAccesses",
        discipline: Discipline::Set,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: NetworkManagerField::Tags,
        name: "tags",
        wire_path: "/tags",
        discipline: Discipline::Scalar,
        mutability: Mutability::Mutable,
    },
];
