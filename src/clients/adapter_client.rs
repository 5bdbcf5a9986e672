use crate::framework::{
    ChangeSet, LifecycleController, ReadOutcome, ReconcileError, RemoteGateway,
    ResourceIdentifier, ResourceKind,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait for adapter-specific clients to inherit the standard operations.
///
/// This trait reduces boilerplate by providing default implementations for
/// `read`, `get`, `delete`, `import` and `apply`.
#[async_trait]
pub trait AdapterClient<K: ResourceKind>: Send + Sync {
    type Gateway: RemoteGateway;

    /// Access the inner generic controller.
    fn controller(&self) -> &LifecycleController<K, Self::Gateway>;

    /// Read an object; a missing object is [`ReadOutcome::Gone`].
    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn read(
        &self,
        id: &ResourceIdentifier,
        cancel: &CancellationToken,
    ) -> Result<ReadOutcome<K::Record>, ReconcileError> {
        tracing::debug!("Sending request");
        self.controller().read(id, cancel).await
    }

    /// Read an object that must exist.
    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn get(
        &self,
        id: &ResourceIdentifier,
        cancel: &CancellationToken,
    ) -> Result<K::Record, ReconcileError> {
        tracing::debug!("Sending request");
        match self.controller().read(id, cancel).await? {
            ReadOutcome::Present(record) => Ok(record),
            ReadOutcome::Gone => Err(ReconcileError::Gone { id: id.to_string() }),
        }
    }

    /// Delete an object by ID.
    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn delete(
        &self,
        id: &ResourceIdentifier,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        tracing::debug!("Sending request");
        self.controller().delete(id, cancel).await
    }

    /// Bring an existing object under management.
    #[tracing::instrument(skip_all, fields(raw_id = %raw_id))]
    async fn import(
        &self,
        raw_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(ResourceIdentifier, K::Record), ReconcileError> {
        tracing::debug!("Sending request");
        self.controller().import(raw_id, cancel).await
    }

    /// Create the object if it is missing, otherwise update whatever differs.
    #[tracing::instrument(skip_all)]
    async fn apply(
        &self,
        desired: &K::Record,
        cancel: &CancellationToken,
    ) -> Result<K::Record, ReconcileError> {
        let id = K::identifier(desired)?;
        tracing::debug!(%id, "Sending request");
        match self.controller().read(&id, cancel).await? {
            ReadOutcome::Gone => self.controller().create(desired, cancel).await,
            ReadOutcome::Present(current) => {
                let changes = ChangeSet::<K::Field>::between::<K>(&current, desired)?;
                self.controller().update(&id, desired, &changes, cancel).await
            }
        }
    }
}
