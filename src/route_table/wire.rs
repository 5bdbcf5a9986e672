use crate::model::{DestinationType, NextHopType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct HubRouteTableResource {
    #[serde(default)]
    pub properties: Option<HubRouteTableProperties>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HubRouteTableProperties {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub routes: Vec<HubRoute>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HubRoute {
    pub name: String,
    pub destination_type: DestinationType,
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(default)]
    pub next_hop_type: NextHopType,
    pub next_hop: String,
}
