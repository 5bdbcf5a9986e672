use arm_reconciler::framework::identity::templates::{NETWORK_WATCHER, VIRTUAL_HUB};
use arm_reconciler::framework::mock::MockGateway;
use arm_reconciler::framework::{
    ChangeSet, GatewayError, LifecycleController, LockCoordinator, ReadOutcome, ReconcileError,
    ResourceIdentifier, ResourceKind, Timeouts,
};
use arm_reconciler::model::{
    HubRouteTable, HubRouteTableField, PacketCapture, PacketCaptureField, Route, StorageLocation,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Controller tests against a scripted gateway.
///
/// Every remote call an operation may make is listed up front; any other call
/// panics inside the mock, so "no write happened" is checked by construction.

const HUB: &str =
    "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Network/virtualHubs/hub1";

fn controller<K: ResourceKind>(mock: &MockGateway) -> LifecycleController<K, MockGateway> {
    LifecycleController::new(
        Arc::new(mock.clone()),
        Arc::new(LockCoordinator::new()),
        Timeouts::default(),
    )
}

fn route_table() -> HubRouteTable {
    let hub = ResourceIdentifier::parse(&VIRTUAL_HUB, HUB).unwrap();
    HubRouteTable::new(hub, "rt1")
        .with_label("default")
        .with_route(Route::cidr("a", ["10.0.0.0/16"], format!("{HUB}/azureFirewalls/fw1")))
        .with_route(Route::cidr("b", ["10.1.0.0/16"], format!("{HUB}/azureFirewalls/fw1")))
}

fn stored(table: &HubRouteTable) -> serde_json::Value {
    let mut payload = HubRouteTable::encode(table).unwrap();
    let id = HubRouteTable::identifier(table).unwrap();
    payload["id"] = json!(id.to_string());
    payload["properties"]["provisioningState"] = json!("Succeeded");
    payload["properties"]["associatedConnections"] = json!([format!("{HUB}/hubVirtualNetworkConnections/c1")]);
    payload
}

#[tokio::test]
async fn test_create_writes_once_and_returns_reread_record() {
    let table = route_table();
    let id = HubRouteTable::identifier(&table).unwrap();

    let mock = MockGateway::new();
    mock.expect_get(&id).return_not_found();
    mock.expect_create_or_update(&id).return_ok(stored(&table));
    mock.expect_get(&id).return_ok(stored(&table));

    let created = controller::<HubRouteTable>(&mock)
        .create(&table, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(created, table);
    let written = mock.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].1["properties"]["routes"][0]["name"], "a");
    mock.verify();
}

#[tokio::test]
async fn test_create_of_existing_object_fails_without_writing() {
    let table = route_table();
    let id = HubRouteTable::identifier(&table).unwrap();

    let mock = MockGateway::new();
    mock.expect_get(&id).return_ok(stored(&table));

    let err = controller::<HubRouteTable>(&mock)
        .create(&table, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ReconcileError::AlreadyExists {
            resource_type: "azurerm_virtual_hub_route_table",
            id: id.to_string(),
        }
    );
    assert!(err.to_string().contains("needs to be imported into the State"));
    assert!(mock.written().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_create_with_failed_reread_reports_retrieval_failure() {
    let table = route_table();
    let id = HubRouteTable::identifier(&table).unwrap();

    let mock = MockGateway::new();
    mock.expect_get(&id).return_not_found();
    mock.expect_create_or_update(&id).return_ok(stored(&table));
    mock.expect_get(&id).return_not_found();

    let err = controller::<HubRouteTable>(&mock)
        .create(&table, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::RetrievalFailed { what: "model", .. }));
    mock.verify();
}

#[tokio::test]
async fn test_update_reorders_routes_and_keeps_unmodeled_fields() {
    let table = route_table();
    let id = HubRouteTable::identifier(&table).unwrap();
    let mut desired = table.clone();
    desired.routes.reverse();

    let mock = MockGateway::new();
    mock.expect_get(&id).return_ok(stored(&table));
    mock.expect_create_or_update(&id).return_ok(stored(&desired));
    mock.expect_get(&id).return_ok(stored(&desired));

    let changes = ChangeSet::between::<HubRouteTable>(&table, &desired).unwrap();
    assert_eq!(changes, ChangeSet::new().with(HubRouteTableField::Routes));

    let updated = controller::<HubRouteTable>(&mock)
        .update(&id, &desired, &changes, &CancellationToken::new())
        .await
        .unwrap();

    let names: Vec<&str> = updated.routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["b", "a"]);

    let (_, sent) = &mock.written()[0];
    assert_eq!(sent["properties"]["routes"][0]["name"], "b");
    assert_eq!(sent["properties"]["routes"][1]["name"], "a");
    assert_eq!(sent["properties"]["provisioningState"], "Succeeded");
    assert_eq!(sent["properties"]["associatedConnections"].as_array().map(Vec::len), Some(1));
    assert_eq!(sent["properties"]["labels"], json!(["default"]));
    mock.verify();
}

#[tokio::test]
async fn test_update_without_properties_fails_before_writing() {
    let table = route_table();
    let id = HubRouteTable::identifier(&table).unwrap();

    let mock = MockGateway::new();
    mock.expect_get(&id).return_ok(json!({ "id": id.to_string(), "properties": null }));

    let err = controller::<HubRouteTable>(&mock)
        .update(
            &id,
            &table,
            &ChangeSet::new().with(HubRouteTableField::Labels),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("retrieving existing {id}: `model.Properties` was nil")
    );
    assert!(mock.written().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_update_of_vanished_object_is_gone() {
    let table = route_table();
    let id = HubRouteTable::identifier(&table).unwrap();

    let mock = MockGateway::new();
    mock.expect_get(&id).return_not_found();

    let err = controller::<HubRouteTable>(&mock)
        .update(
            &id,
            &table,
            &ChangeSet::new().with(HubRouteTableField::Routes),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_gone());
    mock.verify();
}

#[tokio::test]
async fn test_update_of_replace_only_field_makes_no_remote_call() {
    let watcher = ResourceIdentifier::build(&NETWORK_WATCHER, &["0000", "rg1", "nw1"]).unwrap();
    let capture = PacketCapture::new(watcher, "pc1", "vm1", StorageLocation::local_file("/tmp/pc1.cap"));
    let id = PacketCapture::identifier(&capture).unwrap();

    let mock = MockGateway::new();
    let err = controller::<PacketCapture>(&mock)
        .update(
            &id,
            &capture,
            &ChangeSet::new().with(PacketCaptureField::Filters),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ReconcileError::ImmutableField {
            id: id.to_string(),
            field: "filter",
        }
    );
    mock.verify();
}

#[tokio::test]
async fn test_read_of_missing_object_is_gone_not_error() {
    let id = HubRouteTable::identifier(&route_table()).unwrap();

    let mock = MockGateway::new();
    mock.expect_get(&id).return_not_found();

    let outcome = controller::<HubRouteTable>(&mock)
        .read(&id, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, ReadOutcome::Gone);
    mock.verify();
}

#[tokio::test]
async fn test_delete_treats_not_found_as_success() {
    let id = HubRouteTable::identifier(&route_table()).unwrap();

    let mock = MockGateway::new();
    mock.expect_delete(&id).return_not_found();

    controller::<HubRouteTable>(&mock)
        .delete(&id, &CancellationToken::new())
        .await
        .unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_remote_errors_pass_through_unchanged() {
    let id = HubRouteTable::identifier(&route_table()).unwrap();
    let throttled = GatewayError::remote(Some(429), "too many requests", true);

    let mock = MockGateway::new();
    mock.expect_delete(&id).return_err(throttled.clone());

    let err = controller::<HubRouteTable>(&mock)
        .delete(&id, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err, ReconcileError::Remote(throttled));
    mock.verify();
}

#[tokio::test]
async fn test_import_rejects_malformed_ids_before_any_call() {
    let mock = MockGateway::new();
    let err = controller::<HubRouteTable>(&mock)
        .import(&HUB.replace("virtualHubs", "virtualNetworks"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::MalformedIdentifier { .. }));
    mock.verify();
}

#[tokio::test]
async fn test_import_reads_existing_object() {
    let table = route_table();
    let id = HubRouteTable::identifier(&table).unwrap();
    let raw = id.to_string().replace("resourceGroups", "resourcegroups");

    let mock = MockGateway::new();
    mock.expect_get(&id).return_ok(stored(&table));

    let (imported_id, record) = controller::<HubRouteTable>(&mock)
        .import(&raw, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(imported_id.to_string(), id.to_string());
    assert_eq!(record, table);
    mock.verify();
}

#[tokio::test]
async fn test_wrong_kind_of_id_is_rejected() {
    let watcher = ResourceIdentifier::build(&NETWORK_WATCHER, &["0000", "rg1", "nw1"]).unwrap();
    let mock = MockGateway::new();

    let err = controller::<HubRouteTable>(&mock)
        .read(&watcher, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::MalformedIdentifier { .. }));
    mock.verify();
}

#[tokio::test]
async fn test_failed_update_write_releases_lock_and_keeps_error() {
    let table = route_table();
    let id = HubRouteTable::identifier(&table).unwrap();
    let throttled = GatewayError::remote(Some(429), "too many requests", true);

    let mock = MockGateway::new();
    mock.expect_get(&id).return_ok(stored(&table));
    mock.expect_create_or_update(&id).return_err(throttled.clone());

    let locks = Arc::new(LockCoordinator::new());
    let controller: LifecycleController<HubRouteTable, MockGateway> =
        LifecycleController::new(Arc::new(mock.clone()), locks.clone(), Timeouts::default());

    let err = controller
        .update(
            &id,
            &table.clone().with_label("extra"),
            &ChangeSet::new().with(HubRouteTableField::Labels),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, ReconcileError::Remote(throttled));
    assert_eq!(locks.active_keys(), 0);
    mock.verify();
}
