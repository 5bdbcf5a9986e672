use crate::clients::adapter_client::AdapterClient;
use crate::framework::{
    ChangeSet, LifecycleController, ReconcileError, RemoteGateway, ResourceIdentifier,
};
use crate::model::{NetworkManager, NetworkManagerField, NetworkManagerScope};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Client for network managers.
pub struct NetworkManagerClient<G: RemoteGateway> {
    inner: LifecycleController<NetworkManager, G>,
}

impl<G: RemoteGateway> Clone for NetworkManagerClient<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<G: RemoteGateway> NetworkManagerClient<G> {
    pub fn new(inner: LifecycleController<NetworkManager, G>) -> Self {
        Self { inner }
    }

    #[instrument(skip_all, fields(name = %manager.name))]
    pub async fn create_network_manager(
        &self,
        manager: &NetworkManager,
        cancel: &CancellationToken,
    ) -> Result<NetworkManager, ReconcileError> {
        debug!(?manager, "create_network_manager called");
        info!("Sending create_network_manager");
        self.inner.create(manager, cancel).await
    }

    /// Replaces both scope lists. Cross-tenant scopes are left as the server has them.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update_scope(
        &self,
        id: &ResourceIdentifier,
        scope: NetworkManagerScope,
        cancel: &CancellationToken,
    ) -> Result<NetworkManager, ReconcileError> {
        debug!(?scope, "Sending request");
        let current = self.get(id, cancel).await?;
        let desired = NetworkManager { scope, ..current };
        let changes = ChangeSet::new()
            .with(NetworkManagerField::ManagementGroupIds)
            .with(NetworkManagerField::SubscriptionIds);
        self.inner.update(id, &desired, &changes, cancel).await
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn set_description(
        &self,
        id: &ResourceIdentifier,
        description: Option<String>,
        cancel: &CancellationToken,
    ) -> Result<NetworkManager, ReconcileError> {
        debug!(?description, "Sending request");
        let current = self.get(id, cancel).await?;
        let desired = NetworkManager {
            description,
            ..current
        };
        let changes = ChangeSet::new().with(NetworkManagerField::Description);
        self.inner.update(id, &desired, &changes, cancel).await
    }
}

#[async_trait]
impl<G: RemoteGateway> AdapterClient<NetworkManager> for NetworkManagerClient<G> {
    type Gateway = G;

    fn controller(&self) -> &LifecycleController<NetworkManager, G> {
        &self.inner
    }
}
