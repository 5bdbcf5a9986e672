//! [`ResourceKind`] implementation for [`NetworkManager`].

use super::wire::{NetworkManagerProperties, NetworkManagerResource, WireScopes};
use super::{FIELDS, NETWORK_MANAGER};
use crate::framework::mapper::{decode_wire, encode_wire};
use crate::framework::{
    FieldSpec, IdTemplate, ReconcileError, ResourceIdentifier, ResourceKind, WirePayload,
};
use crate::model::{NetworkManager, NetworkManagerField, NetworkManagerScope};

impl ResourceKind for NetworkManager {
    type Record = Self;
    type Field = NetworkManagerField;
    const TYPE_NAME: &'static str = "azurerm_network_manager";

    fn template() -> &'static IdTemplate {
        &NETWORK_MANAGER
    }

    fn fields() -> &'static [FieldSpec<NetworkManagerField>] {
        &FIELDS
    }

    fn identifier(record: &Self) -> Result<ResourceIdentifier, ReconcileError> {
        ResourceIdentifier::build(
            &NETWORK_MANAGER,
            &[
                record.subscription_id.as_str(),
                record.resource_group_name.as_str(),
                record.name.as_str(),
            ],
        )
    }

    fn encode(record: &Self) -> Result<WirePayload, ReconcileError> {
        let wire = NetworkManagerResource {
            location: normalize_location(&record.location),
            tags: record.tags.clone(),
            properties: Some(NetworkManagerProperties {
                description: record.description.clone().filter(|d| !d.is_empty()),
                network_manager_scopes: WireScopes {
                    management_groups: record.scope.management_group_ids.iter().cloned().collect(),
                    subscriptions: record.scope.subscription_ids.iter().cloned().collect(),
                    cross_tenant_scopes: Vec::new(),
                },
                network_manager_scope_accesses: record.scope_accesses.iter().copied().collect(),
            }),
        };
        encode_wire(Self::TYPE_NAME, &wire)
    }

    fn decode(id: &ResourceIdentifier, payload: &WirePayload) -> Result<Self, ReconcileError> {
        let wire: NetworkManagerResource = decode_wire(Self::TYPE_NAME, payload)?;
        let properties = wire.properties.ok_or_else(|| ReconcileError::RetrievalFailed {
            id: id.to_string(),
            what: "model.Properties",
        })?;
        let segment = |name: &str| id.segment(name).unwrap_or_default().to_string();
        let scopes = properties.network_manager_scopes;

        Ok(NetworkManager {
            name: id.name().to_string(),
            subscription_id: segment("subscriptionId"),
            resource_group_name: segment("resourceGroupName"),
            location: normalize_location(&wire.location),
            description: properties.description.filter(|d| !d.is_empty()),
            scope: NetworkManagerScope {
                management_group_ids: scopes.management_groups.into_iter().collect(),
                subscription_ids: scopes.subscriptions.into_iter().collect(),
            },
            scope_accesses: properties.network_manager_scope_accesses.into_iter().collect(),
            tags: wire.tags,
            cross_tenant_scopes: scopes.cross_tenant_scopes,
        })
    }
}

/// The API answers `West Europe` for `westeurope`. Both sides of a diff go
/// through this, so either spelling in a record is the same location.
fn normalize_location(location: &str) -> String {
    location.replace(' ', "").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mapper::merge_changes;
    use crate::framework::ChangeSet;
    use crate::model::ScopeAccess;
    use serde_json::json;

    fn manager() -> NetworkManager {
        NetworkManager::new("0000", "rg1", "nm1", "westeurope")
            .with_subscription_scope("/subscriptions/0000")
            .with_access(ScopeAccess::SecurityAdmin)
            .with_access(ScopeAccess::Connectivity)
            .with_tag("env", "test")
    }

    #[test]
    fn test_is_its_own_lock_container() {
        let id = NetworkManager::identifier(&manager()).unwrap();
        assert_eq!(
            id.to_string(),
            "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Network/networkManagers/nm1"
        );
        assert_eq!(id.parent_id(), None);
        assert_eq!(id.parent_key().namespace(), "Network Manager");
    }

    #[test]
    fn test_decode_normalizes_location_and_reads_cross_tenant_scopes() {
        let id = NetworkManager::identifier(&manager()).unwrap();
        let mut payload = NetworkManager::encode(&manager()).unwrap();
        payload["location"] = json!("West Europe");
        payload["properties"]["networkManagerScopes"]["crossTenantScopes"] =
            json!([{ "tenantId": "t1", "subscriptions": ["/subscriptions/1111"] }]);

        let decoded = NetworkManager::decode(&id, &payload).unwrap();
        assert_eq!(decoded.location, "westeurope");
        assert_eq!(decoded.cross_tenant_scopes.len(), 1);
        assert_eq!(decoded.cross_tenant_scopes[0].tenant_id, "t1");
        assert_eq!(decoded.scope, manager().scope);
        assert_eq!(decoded.scope_accesses, manager().scope_accesses);
    }

    #[test]
    fn test_scope_update_keeps_cross_tenant_scopes() {
        let current = json!({
            "location": "westeurope",
            "properties": {
                "networkManagerScopes": {
                    "subscriptions": ["/subscriptions/0000"],
                    "crossTenantScopes": [{ "tenantId": "t1" }]
                },
                "networkManagerScopeAccesses": ["Connectivity"],
                "provisioningState": "Succeeded"
            }
        });
        let desired = manager().with_subscription_scope("/subscriptions/2222");
        let changes = ChangeSet::between::<NetworkManager>(&manager(), &desired).unwrap();
        assert_eq!(changes, ChangeSet::new().with(NetworkManagerField::SubscriptionIds));

        let merged = merge_changes::<NetworkManager>(&current, &desired, &changes).unwrap();
        let scopes = &merged["properties"]["networkManagerScopes"];
        assert_eq!(
            scopes["subscriptions"],
            json!(["/subscriptions/0000", "/subscriptions/2222"])
        );
        assert_eq!(scopes["crossTenantScopes"], json!([{ "tenantId": "t1" }]));
    }

    #[test]
    fn test_display_location_is_not_a_change() {
        let configured = NetworkManager::new("0000", "rg1", "nm1", "West Europe");
        let id = NetworkManager::identifier(&configured).unwrap();
        let payload = NetworkManager::encode(&configured).unwrap();
        assert_eq!(payload["location"], "westeurope");

        let decoded = NetworkManager::decode(&id, &payload).unwrap();
        assert!(ChangeSet::between::<NetworkManager>(&decoded, &configured)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_empty_description_is_not_sent() {
        let mut configured = manager();
        configured.description = Some(String::new());
        let id = NetworkManager::identifier(&configured).unwrap();
        let payload = NetworkManager::encode(&configured).unwrap();
        assert!(payload["properties"].get("description").is_none());

        let decoded = NetworkManager::decode(&id, &payload).unwrap();
        assert!(ChangeSet::between::<NetworkManager>(&decoded, &configured)
            .unwrap()
            .is_empty());

        let described = manager();
        let mut cleared = described.clone();
        cleared.description = Some(String::new());
        let described = NetworkManager {
            description: Some("hub and spoke".into()),
            ..described
        };
        assert_eq!(
            ChangeSet::between::<NetworkManager>(&described, &cleared).unwrap(),
            ChangeSet::new().with(NetworkManagerField::Description)
        );
    }

    #[test]
    fn test_access_order_is_not_a_change() {
        let a = manager();
        let mut b = manager();
        b.scope_accesses.clear();
        b.scope_accesses.insert(ScopeAccess::Connectivity);
        b.scope_accesses.insert(ScopeAccess::SecurityAdmin);
        assert!(ChangeSet::between::<NetworkManager>(&a, &b).unwrap().is_empty());
    }
}
