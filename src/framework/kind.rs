//! # ResourceKind Trait
//!
//! The contract every adapter implements so the generic
//! [`LifecycleController`](crate::framework::LifecycleController) can drive it.
//!
//! # Architecture Note
//! The controller logic (existence check, lock, read-modify-write, re-read) is
//! written *once* against this trait. An adapter only supplies:
//!
//! - its id layout ([`ResourceKind::template`]),
//! - its field table ([`ResourceKind::fields`]) saying where each field lives
//!   on the wire and whether it is ordered, a set, or replace-only,
//! - a pair of mapping functions between its flat record and the wire payload.
//!
//! Associated types keep records of one kind from being handed to another
//! kind's controller.

use crate::framework::error::ReconcileError;
use crate::framework::gateway::WirePayload;
use crate::framework::identity::{IdTemplate, ResourceIdentifier};
use crate::framework::mapper::FieldSpec;
use std::fmt::Debug;
use std::hash::Hash;

pub trait ResourceKind: Send + Sync + 'static {
    /// The adapter-facing flat record.
    type Record: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Enumerates the record's fields; used for change sets.
    type Field: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Name of the adapter, e.g. `azurerm_virtual_hub_route_table`.
    const TYPE_NAME: &'static str;

    fn template() -> &'static IdTemplate;

    fn fields() -> &'static [FieldSpec<Self::Field>];

    /// Builds the target id from a fully populated record.
    fn identifier(record: &Self::Record) -> Result<ResourceIdentifier, ReconcileError>;

    /// Record -> wire. Must only emit fields the record sets.
    fn encode(record: &Self::Record) -> Result<WirePayload, ReconcileError>;

    /// Wire -> record. Server-assigned values are taken from `payload`.
    fn decode(id: &ResourceIdentifier, payload: &WirePayload)
        -> Result<Self::Record, ReconcileError>;

    fn parse_id(raw: &str) -> Result<ResourceIdentifier, ReconcileError> {
        ResourceIdentifier::parse(Self::template(), raw)
    }

    fn field_spec(field: Self::Field) -> Option<&'static FieldSpec<Self::Field>> {
        Self::fields().iter().find(|spec| spec.field == field)
    }
}
