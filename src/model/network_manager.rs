use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A network manager: the root container for network groups, connectivity
/// and security admin configurations across a set of subscriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkManager {
    pub name: String,
    pub subscription_id: String,
    pub resource_group_name: String,
    pub location: String,
    pub description: Option<String>,
    pub scope: NetworkManagerScope,
    pub scope_accesses: BTreeSet<ScopeAccess>,
    pub tags: BTreeMap<String, String>,
    /// Assigned by the server; ignored on write.
    pub cross_tenant_scopes: Vec<CrossTenantScope>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkManagerScope {
    pub management_group_ids: BTreeSet<String>,
    pub subscription_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossTenantScope {
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub management_groups: Vec<String>,
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScopeAccess {
    Connectivity,
    SecurityAdmin,
    Routing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkManagerField {
    Location,
    Description,
    ManagementGroupIds,
    SubscriptionIds,
    ScopeAccesses,
    Tags,
}

impl NetworkManager {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            location: location.into(),
            description: None,
            scope: NetworkManagerScope::default(),
            scope_accesses: BTreeSet::new(),
            tags: BTreeMap::new(),
            cross_tenant_scopes: Vec::new(),
        }
    }

    pub fn with_subscription_scope(mut self, subscription_id: impl Into<String>) -> Self {
        self.scope.subscription_ids.insert(subscription_id.into());
        self
    }

    pub fn with_management_group_scope(mut self, management_group_id: impl Into<String>) -> Self {
        self.scope.management_group_ids.insert(management_group_id.into());
        self
    }

    pub fn with_access(mut self, access: ScopeAccess) -> Self {
        self.scope_accesses.insert(access);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}
