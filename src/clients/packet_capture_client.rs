use crate::clients::adapter_client::AdapterClient;
use crate::framework::{
    LifecycleController, ReconcileError, RemoteGateway, ResourceIdentifier, ResourceKind,
};
use crate::model::PacketCapture;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Client for network watcher packet captures.
///
/// Captures are immutable, so there is no in-place update: changing one goes
/// through [`replace`](Self::replace).
pub struct PacketCaptureClient<G: RemoteGateway> {
    inner: LifecycleController<PacketCapture, G>,
}

impl<G: RemoteGateway> Clone for PacketCaptureClient<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<G: RemoteGateway> PacketCaptureClient<G> {
    pub fn new(inner: LifecycleController<PacketCapture, G>) -> Self {
        Self { inner }
    }

    #[instrument(skip_all, fields(name = %capture.name))]
    pub async fn start_capture(
        &self,
        capture: &PacketCapture,
        cancel: &CancellationToken,
    ) -> Result<PacketCapture, ReconcileError> {
        debug!(?capture, "start_capture called");
        info!("Sending start_capture");
        self.inner.create(capture, cancel).await
    }

    /// Deletes the capture and starts `capture` in its place.
    ///
    /// The two steps take the watcher's lock separately; a failed start leaves
    /// no capture behind.
    #[instrument(skip_all, fields(name = %capture.name))]
    pub async fn replace(
        &self,
        capture: &PacketCapture,
        cancel: &CancellationToken,
    ) -> Result<PacketCapture, ReconcileError> {
        let id: ResourceIdentifier = PacketCapture::identifier(capture)?;
        debug!(%id, "Sending request");
        self.inner.delete(&id, cancel).await?;
        self.inner.create(capture, cancel).await
    }
}

#[async_trait]
impl<G: RemoteGateway> AdapterClient<PacketCapture> for PacketCaptureClient<G> {
    type Gateway = G;

    fn controller(&self) -> &LifecycleController<PacketCapture, G> {
        &self.inner
    }
}
