use crate::clients::{NetworkManagerClient, PacketCaptureClient, RouteTableClient};
use crate::framework::{LifecycleController, LockCoordinator, RemoteGateway};
use crate::lifecycle::config::EngineConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Wires one gateway, one lock coordinator and one configuration into every
/// adapter client.
///
/// `Provider` is responsible for:
/// - **Dependency Wiring**: every client shares the same [`LockCoordinator`],
///   so a route table and anything else written through the same hub serialize
///   against each other.
/// - **Cancellation**: [`operation_token`](Self::operation_token) hands out
///   child tokens of one root; [`shutdown`](Self::shutdown) cancels all of
///   them, and every in-flight operation releases its lock on the way out.
///
/// # Example
///
/// ```ignore
/// let provider = Provider::new(Arc::new(InMemoryGateway::new()), EngineConfig::default());
/// let token = provider.operation_token();
/// let table = provider.route_tables.create_route_table(&record, &token).await?;
/// provider.shutdown();
/// ```
pub struct Provider<G: RemoteGateway> {
    /// Client for virtual hub route tables
    pub route_tables: RouteTableClient<G>,

    /// Client for packet captures
    pub packet_captures: PacketCaptureClient<G>,

    /// Client for network managers
    pub network_managers: NetworkManagerClient<G>,

    gateway: Arc<G>,
    locks: Arc<LockCoordinator>,
    config: EngineConfig,
    root: CancellationToken,
}

impl<G: RemoteGateway> Provider<G> {
    pub fn new(gateway: Arc<G>, config: EngineConfig) -> Self {
        let locks = Arc::new(LockCoordinator::new());
        let timeouts = config.timeouts;

        Self {
            route_tables: RouteTableClient::new(LifecycleController::new(
                gateway.clone(),
                locks.clone(),
                timeouts,
            )),
            packet_captures: PacketCaptureClient::new(LifecycleController::new(
                gateway.clone(),
                locks.clone(),
                timeouts,
            )),
            network_managers: NetworkManagerClient::new(LifecycleController::new(
                gateway.clone(),
                locks.clone(),
                timeouts,
            )),
            gateway,
            locks,
            config,
            root: CancellationToken::new(),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn locks(&self) -> &Arc<LockCoordinator> {
        &self.locks
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A token for one operation; cancelled by [`shutdown`](Self::shutdown).
    pub fn operation_token(&self) -> CancellationToken {
        self.root.child_token()
    }

    /// Cancels every outstanding operation token.
    pub fn shutdown(&self) {
        info!(held_locks = self.locks.active_keys(), "Shutting down provider...");
        self.root.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}
