//! [`ResourceKind`] implementation for [`HubRouteTable`].

use super::wire::{HubRoute, HubRouteTableProperties, HubRouteTableResource};
use super::{FIELDS, HUB_ROUTE_TABLE};
use crate::framework::mapper::{decode_wire, encode_wire};
use crate::framework::{
    FieldSpec, IdTemplate, ReconcileError, ResourceIdentifier, ResourceKind, WirePayload,
};
use crate::model::{HubRouteTable, HubRouteTableField, Route};

impl ResourceKind for HubRouteTable {
    type Record = Self;
    type Field = HubRouteTableField;
    const TYPE_NAME: &'static str = "azurerm_virtual_hub_route_table";

    fn template() -> &'static IdTemplate {
        &HUB_ROUTE_TABLE
    }

    fn fields() -> &'static [FieldSpec<HubRouteTableField>] {
        &FIELDS
    }

    fn identifier(record: &Self) -> Result<ResourceIdentifier, ReconcileError> {
        record.virtual_hub_id.child(&HUB_ROUTE_TABLE, &[record.name.as_str()])
    }

    fn encode(record: &Self) -> Result<WirePayload, ReconcileError> {
        let wire = HubRouteTableResource {
            properties: Some(HubRouteTableProperties {
                labels: record.labels.iter().cloned().collect(),
                routes: record
                    .routes
                    .iter()
                    .map(|route| HubRoute {
                        name: route.name.clone(),
                        destination_type: route.destinations_type,
                        destinations: route.destinations.iter().cloned().collect(),
                        next_hop_type: route.next_hop_type,
                        next_hop: route.next_hop.clone(),
                    })
                    .collect(),
            }),
        };
        encode_wire(Self::TYPE_NAME, &wire)
    }

    fn decode(id: &ResourceIdentifier, payload: &WirePayload) -> Result<Self, ReconcileError> {
        let wire: HubRouteTableResource = decode_wire(Self::TYPE_NAME, payload)?;
        let properties = wire.properties.ok_or_else(|| ReconcileError::RetrievalFailed {
            id: id.to_string(),
            what: "model.Properties",
        })?;
        let virtual_hub_id = id.parent_id().ok_or_else(|| {
            ReconcileError::mapping(Self::TYPE_NAME, format!("{id} has no virtual hub"))
        })?;

        Ok(HubRouteTable {
            name: id.name().to_string(),
            virtual_hub_id,
            labels: properties.labels.into_iter().collect(),
            routes: properties
                .routes
                .into_iter()
                .map(|route| Route {
                    name: route.name,
                    destinations: route.destinations.into_iter().collect(),
                    destinations_type: route.destination_type,
                    next_hop: route.next_hop,
                    next_hop_type: route.next_hop_type,
                })
                .collect(),
        })
    }
}
