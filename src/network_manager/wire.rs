use crate::model::{CrossTenantScope, ScopeAccess};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct NetworkManagerResource {
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub properties: Option<NetworkManagerProperties>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NetworkManagerProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub network_manager_scopes: WireScopes,
    #[serde(default)]
    pub network_manager_scope_accesses: Vec<ScopeAccess>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireScopes {
    #[serde(default)]
    pub management_groups: Vec<String>,
    #[serde(default)]
    pub subscriptions: Vec<String>,
    #[serde(default, skip_serializing)]
    pub cross_tenant_scopes: Vec<CrossTenantScope>,
}
