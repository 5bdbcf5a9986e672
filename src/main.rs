//! Demo: reconciles a hub route table against an in-memory control plane.

use arm_reconciler::clients::AdapterClient;
use arm_reconciler::framework::identity::templates::VIRTUAL_HUB;
use arm_reconciler::framework::memory::InMemoryGateway;
use arm_reconciler::framework::{ReadOutcome, ResourceIdentifier, ResourceKind};
use arm_reconciler::lifecycle::{setup_tracing, EngineConfig, Provider};
use arm_reconciler::model::{HubRouteTable, Route};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Instrument};

const HUB: &str =
    "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/demo/providers/Microsoft.Network/virtualHubs/hub1";

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting route table reconciliation demo");

    let gateway = Arc::new(InMemoryGateway::new().with_latency(Duration::from_millis(25)));
    let provider = Provider::new(gateway.clone(), EngineConfig::default());
    let token = provider.operation_token();

    let hub = ResourceIdentifier::parse(&VIRTUAL_HUB, HUB).map_err(|e| e.to_string())?;
    let firewall = format!("{HUB}/azureFirewalls/fw1");
    let table = HubRouteTable::new(hub, "rt1")
        .with_label("default")
        .with_route(Route::cidr("a", ["10.0.0.0/16"], firewall.clone()))
        .with_route(Route::cidr("b", ["10.1.0.0/16"], firewall));
    let id = HubRouteTable::identifier(&table).map_err(|e| e.to_string())?;

    // Create
    let span = tracing::info_span!("route_table_creation");
    let created = async {
        provider
            .route_tables
            .create_route_table(&table, &token)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    info!(%id, routes = created.routes.len(), "Route table created successfully");

    // Creating again must fail: the object now exists.
    match provider.route_tables.create_route_table(&table, &token).await {
        Err(e) => info!(error = %e, "Second create rejected as expected"),
        Ok(_) => {
            error!("Second create unexpectedly succeeded");
            return Err("duplicate create was not rejected".into());
        }
    }

    // Reorder routes: B before A.
    let mut reordered = created.routes.clone();
    reordered.reverse();
    let updated = provider
        .route_tables
        .replace_routes(&id, reordered, &token)
        .await
        .map_err(|e| e.to_string())?;
    let names: Vec<&str> = updated.routes.iter().map(|r| r.name.as_str()).collect();
    info!(?names, "Routes reordered");

    // Someone deletes the table out of band; the next read reports it gone.
    gateway.remove(&id);
    match provider.route_tables.read(&id, &token).await {
        Ok(ReadOutcome::Gone) => info!(%id, "Route table gone, dropping local state"),
        Ok(ReadOutcome::Present(_)) => return Err("expected the table to be gone".into()),
        Err(e) => return Err(e.to_string()),
    }

    // Deleting something already gone still succeeds.
    provider
        .route_tables
        .delete(&id, &token)
        .await
        .map_err(|e| e.to_string())?;

    provider.shutdown();
    info!(calls = gateway.calls().len(), "Demo completed successfully");
    Ok(())
}
