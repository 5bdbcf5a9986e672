use crate::framework::ResourceIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A route table attached to a virtual hub.
///
/// Route order is significant to the hub and is kept as given; labels and
/// route destinations are sets.
#[derive(Debug, Clone, PartialEq)]
pub struct HubRouteTable {
    pub name: String,
    pub virtual_hub_id: ResourceIdentifier,
    pub labels: BTreeSet<String>,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub destinations: BTreeSet<String>,
    pub destinations_type: DestinationType,
    pub next_hop: String,
    pub next_hop_type: NextHopType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationType {
    #[serde(rename = "CIDR")]
    Cidr,
    ResourceId,
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NextHopType {
    #[default]
    ResourceId,
}

/// Fields of [`HubRouteTable`] that an update can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubRouteTableField {
    Labels,
    Routes,
}

impl HubRouteTable {
    pub fn new(virtual_hub_id: ResourceIdentifier, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            virtual_hub_id,
            labels: BTreeSet::new(),
            routes: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }
}

impl Route {
    /// A route sending CIDR destinations to a resource next hop.
    pub fn cidr<I, S>(name: impl Into<String>, destinations: I, next_hop: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            destinations: destinations.into_iter().map(Into::into).collect(),
            destinations_type: DestinationType::Cidr,
            next_hop: next_hop.into(),
            next_hop_type: NextHopType::ResourceId,
        }
    }
}
