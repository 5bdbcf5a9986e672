use crate::clients::adapter_client::AdapterClient;
use crate::framework::{
    ChangeSet, LifecycleController, ReconcileError, RemoteGateway, ResourceIdentifier,
};
use crate::model::{HubRouteTable, HubRouteTableField, Route};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Client for virtual hub route tables.
pub struct RouteTableClient<G: RemoteGateway> {
    inner: LifecycleController<HubRouteTable, G>,
}

impl<G: RemoteGateway> Clone for RouteTableClient<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<G: RemoteGateway> RouteTableClient<G> {
    pub fn new(inner: LifecycleController<HubRouteTable, G>) -> Self {
        Self { inner }
    }

    #[instrument(skip_all, fields(name = %table.name))]
    pub async fn create_route_table(
        &self,
        table: &HubRouteTable,
        cancel: &CancellationToken,
    ) -> Result<HubRouteTable, ReconcileError> {
        debug!(?table, "create_route_table called");
        info!("Sending create_route_table");
        self.inner.create(table, cancel).await
    }

    /// Replaces the whole route list, keeping the given order.
    #[instrument(skip_all, fields(id = %id, routes = routes.len()))]
    pub async fn replace_routes(
        &self,
        id: &ResourceIdentifier,
        routes: Vec<Route>,
        cancel: &CancellationToken,
    ) -> Result<HubRouteTable, ReconcileError> {
        debug!("Sending request");
        let current = self.get(id, cancel).await?;
        let desired = HubRouteTable { routes, ..current };
        let changes = ChangeSet::new().with(HubRouteTableField::Routes);
        self.inner.update(id, &desired, &changes, cancel).await
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn set_labels(
        &self,
        id: &ResourceIdentifier,
        labels: BTreeSet<String>,
        cancel: &CancellationToken,
    ) -> Result<HubRouteTable, ReconcileError> {
        debug!(?labels, "Sending request");
        let current = self.get(id, cancel).await?;
        let desired = HubRouteTable { labels, ..current };
        let changes = ChangeSet::new().with(HubRouteTableField::Labels);
        self.inner.update(id, &desired, &changes, cancel).await
    }
}

#[async_trait]
impl<G: RemoteGateway> AdapterClient<HubRouteTable> for RouteTableClient<G> {
    type Gateway = G;

    fn controller(&self) -> &LifecycleController<HubRouteTable, G> {
        &self.inner
    }
}
