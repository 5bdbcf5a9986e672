//! # Lifecycle Controller
//!
//! The generic Create / Read / Update / Delete driver shared by every adapter.
//!
//! ## State machine
//!
//! ```text
//! Absent ──create──▶ Creating ──▶ Present ──update──▶ Updating ──▶ Present
//!                                    │                                │
//!                                    ├──out-of-band delete──▶ Gone    │
//!                                    └──────────delete──▶ Deleting ◀──┘──▶ Absent
//! ```
//!
//! ## Operations
//!
//! * **Create**:
//!     1. Builds the id from the record and encodes the payload (no remote call on failure).
//!     2. Reads the id; an existing object fails with `AlreadyExists`.
//!     3. Holds the parent lock around `CreateOrUpdate`.
//!     4. Re-reads and returns the decoded record.
//!
//! * **Read**: A not-found answer is [`ReadOutcome::Gone`], not an error.
//!
//! * **Update**:
//!     1. Rejects changes to replace-only fields before any remote call.
//!     2. Under the parent lock: reads the current payload, merges only the
//!        changed fields, validates the merge by decoding it, writes it back.
//!     3. Re-reads and returns the decoded record.
//!
//! * **Delete**: Under the parent lock. Deleting something already absent succeeds.
//!
//! Every operation is bounded by its timeout and by a cancellation token. The
//! operation future is dropped when either fires, which drops any lock it holds
//! before the error is returned. Gateway errors come back untouched; nothing
//! here retries.

use crate::framework::error::ReconcileError;
use crate::framework::gateway::{GatewayError, RemoteGateway, WirePayload};
use crate::framework::identity::ResourceIdentifier;
use crate::framework::kind::ResourceKind;
use crate::framework::lock::LockCoordinator;
use crate::framework::mapper::{merge_changes, ChangeSet, Mutability};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

/// Lifecycle states of one managed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
    /// Removed out of band; local state should be dropped.
    Gone,
}

impl ResourceState {
    pub fn can_transition_to(self, next: ResourceState) -> bool {
        use ResourceState::*;
        matches!(
            (self, next),
            (Absent, Creating)
                | (Creating, Present)
                | (Creating, Absent)
                | (Present, Updating)
                | (Updating, Present)
                | (Present, Gone)
                | (Updating, Gone)
                | (_, Deleting)
                | (Deleting, Absent)
        )
    }
}

/// Result of a read.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<R> {
    Present(R),
    /// The object no longer exists; the caller drops its local state.
    Gone,
}

impl<R> ReadOutcome<R> {
    pub fn state(&self) -> ResourceState {
        match self {
            ReadOutcome::Present(_) => ResourceState::Present,
            ReadOutcome::Gone => ResourceState::Gone,
        }
    }

    pub fn into_present(self) -> Option<R> {
        match self {
            ReadOutcome::Present(record) => Some(record),
            ReadOutcome::Gone => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Per-operation time limits, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub create: u64,
    pub read: u64,
    pub update: u64,
    pub delete: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: 30 * 60,
            read: 5 * 60,
            update: 30 * 60,
            delete: 30 * 60,
        }
    }
}

impl Timeouts {
    pub fn seconds(&self, operation: Operation) -> u64 {
        match operation {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    pub fn limit(&self, operation: Operation) -> Duration {
        Duration::from_secs(self.seconds(operation))
    }
}

/// Drives one resource kind `K` against a gateway `G`.
pub struct LifecycleController<K: ResourceKind, G: RemoteGateway> {
    gateway: Arc<G>,
    locks: Arc<LockCoordinator>,
    timeouts: Timeouts,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind, G: RemoteGateway> Clone for LifecycleController<K, G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            locks: Arc::clone(&self.locks),
            timeouts: self.timeouts,
            _kind: PhantomData,
        }
    }
}

impl<K: ResourceKind, G: RemoteGateway> LifecycleController<K, G> {
    pub fn new(gateway: Arc<G>, locks: Arc<LockCoordinator>, timeouts: Timeouts) -> Self {
        Self {
            gateway,
            locks,
            timeouts,
            _kind: PhantomData,
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Creates the object described by `record` and returns what the server stored.
    pub async fn create(
        &self,
        record: &K::Record,
        cancel: &CancellationToken,
    ) -> Result<K::Record, ReconcileError> {
        let id = K::identifier(record)?;
        let payload = K::encode(record)?;
        debug!(resource_type = K::TYPE_NAME, %id, ?record, "create called");

        let span = info_span!("create", resource_type = K::TYPE_NAME, %id);
        self.bounded(Operation::Create, &id, cancel, async {
            // Held across the existence check and the write.
            let lock = self.locks.acquire(&id.parent_key()).await;
            match self.gateway.get(&id).await {
                Ok(_) => {
                    warn!("Resource already exists");
                    return Err(ReconcileError::AlreadyExists {
                        resource_type: K::TYPE_NAME,
                        id: id.to_string(),
                    });
                }
                Err(GatewayError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }

            transition(&id, ResourceState::Absent, ResourceState::Creating);
            if let Err(e) = self.gateway.create_or_update(&id, payload).await {
                transition(&id, ResourceState::Creating, ResourceState::Absent);
                return Err(e.into());
            }
            lock.release();
            transition(&id, ResourceState::Creating, ResourceState::Present);
            info!("Created");

            self.reread(&id).await
        })
        .instrument(span)
        .await
    }

    /// Reads the object. A missing object is [`ReadOutcome::Gone`].
    pub async fn read(
        &self,
        id: &ResourceIdentifier,
        cancel: &CancellationToken,
    ) -> Result<ReadOutcome<K::Record>, ReconcileError> {
        ensure_kind::<K>(id)?;
        let span = info_span!("read", resource_type = K::TYPE_NAME, %id);
        self.bounded(Operation::Read, id, cancel, async {
            match self.gateway.get(id).await {
                Ok(payload) => {
                    let record = decode_present::<K>(id, &payload)?;
                    debug!(?record, "Read");
                    Ok(ReadOutcome::Present(record))
                }
                Err(GatewayError::NotFound) => {
                    warn!("{} {} was not found - removing from state", K::TYPE_NAME, id);
                    transition(id, ResourceState::Present, ResourceState::Gone);
                    Ok(ReadOutcome::Gone)
                }
                Err(e) => Err(e.into()),
            }
        })
        .instrument(span)
        .await
    }

    /// Applies the fields in `changes` from `record` to the remote object.
    pub async fn update(
        &self,
        id: &ResourceIdentifier,
        record: &K::Record,
        changes: &ChangeSet<K::Field>,
        cancel: &CancellationToken,
    ) -> Result<K::Record, ReconcileError> {
        ensure_kind::<K>(id)?;
        for field in changes.iter() {
            let spec = K::field_spec(field).ok_or_else(|| {
                ReconcileError::mapping(K::TYPE_NAME, format!("{field:?} has no field spec"))
            })?;
            if spec.mutability == Mutability::ForceNew {
                return Err(ReconcileError::ImmutableField {
                    id: id.to_string(),
                    field: spec.name,
                });
            }
        }

        let span = info_span!("update", resource_type = K::TYPE_NAME, %id);
        self.bounded(Operation::Update, id, cancel, async {
            debug!(?changes, "update called");
            if changes.is_empty() {
                debug!("No changes to apply");
                return self.reread(id).await;
            }

            let lock = self.locks.acquire(&id.parent_key()).await;
            transition(id, ResourceState::Present, ResourceState::Updating);
            let written = self.write_changes(id, record, changes).await;
            lock.release();

            match &written {
                Err(ReconcileError::Gone { .. }) => {
                    transition(id, ResourceState::Updating, ResourceState::Gone)
                }
                _ => transition(id, ResourceState::Updating, ResourceState::Present),
            }
            written?;
            info!("Updated");

            self.reread(id).await
        })
        .instrument(span)
        .await
    }

    /// Deletes the object. Succeeds if it is already gone.
    pub async fn delete(
        &self,
        id: &ResourceIdentifier,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        ensure_kind::<K>(id)?;
        let span = info_span!("delete", resource_type = K::TYPE_NAME, %id);
        self.bounded(Operation::Delete, id, cancel, async {
            let lock = self.locks.acquire(&id.parent_key()).await;
            transition(id, ResourceState::Present, ResourceState::Deleting);
            match self.gateway.delete(id).await {
                Ok(()) => info!("Deleted"),
                Err(GatewayError::NotFound) => {
                    debug!("{} {} was not found - assuming removed", K::TYPE_NAME, id)
                }
                Err(e) => return Err(e.into()),
            }
            lock.release();
            transition(id, ResourceState::Deleting, ResourceState::Absent);
            Ok(())
        })
        .instrument(span)
        .await
    }

    /// Parses a user-supplied id and reads the object it names.
    ///
    /// Unlike [`read`](Self::read), a missing object is an error here: there is
    /// nothing to import.
    pub async fn import(
        &self,
        raw_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(ResourceIdentifier, K::Record), ReconcileError> {
        let id = K::parse_id(raw_id)?;
        match self.read(&id, cancel).await? {
            ReadOutcome::Present(record) => Ok((id, record)),
            ReadOutcome::Gone => Err(ReconcileError::Gone { id: id.to_string() }),
        }
    }

    /// Read-modify-write of the changed fields. Runs under the parent lock.
    async fn write_changes(
        &self,
        id: &ResourceIdentifier,
        record: &K::Record,
        changes: &ChangeSet<K::Field>,
    ) -> Result<(), ReconcileError> {
        let current = match self.gateway.get(id).await {
            Ok(payload) => payload,
            Err(GatewayError::NotFound) => {
                warn!("Resource disappeared before update");
                return Err(ReconcileError::Gone { id: id.to_string() });
            }
            Err(e) => return Err(e.into()),
        };
        ensure_properties(id, &current)?;

        let merged = merge_changes::<K>(&current, record, changes)?;
        K::decode(id, &merged)?;
        self.gateway.create_or_update(id, merged).await?;
        Ok(())
    }

    async fn reread(&self, id: &ResourceIdentifier) -> Result<K::Record, ReconcileError> {
        match self.gateway.get(id).await {
            Ok(payload) => decode_present::<K>(id, &payload),
            Err(GatewayError::NotFound) => Err(ReconcileError::RetrievalFailed {
                id: id.to_string(),
                what: "model",
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn bounded<T>(
        &self,
        operation: Operation,
        id: &ResourceIdentifier,
        cancel: &CancellationToken,
        work: impl Future<Output = Result<T, ReconcileError>>,
    ) -> Result<T, ReconcileError> {
        let limit = self.timeouts.limit(operation);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(operation = operation.as_str(), %id, "Cancelled");
                Err(ReconcileError::Cancelled {
                    operation: operation.as_str(),
                    id: id.to_string(),
                })
            }
            result = tokio::time::timeout(limit, work) => match result {
                Ok(result) => result,
                Err(_) => {
                    warn!(operation = operation.as_str(), %id, "Deadline exceeded");
                    Err(ReconcileError::DeadlineExceeded {
                        operation: operation.as_str(),
                        id: id.to_string(),
                        seconds: self.timeouts.seconds(operation),
                    })
                }
            },
        }
    }
}

fn transition(id: &ResourceIdentifier, from: ResourceState, to: ResourceState) {
    debug_assert!(from.can_transition_to(to), "{from:?} -> {to:?}");
    debug!(%id, ?from, ?to, "Transition");
}

fn ensure_kind<K: ResourceKind>(id: &ResourceIdentifier) -> Result<(), ReconcileError> {
    if id.kind() == K::template().kind {
        Ok(())
    } else {
        Err(ReconcileError::malformed(
            K::template().kind,
            id.to_string(),
            format!("expected a {} ID but got a {} ID", K::template().kind, id.kind()),
        ))
    }
}

fn ensure_properties(id: &ResourceIdentifier, payload: &WirePayload) -> Result<(), ReconcileError> {
    if payload.is_null() {
        return Err(ReconcileError::RetrievalFailed {
            id: id.to_string(),
            what: "model",
        });
    }
    match payload.get("properties") {
        Some(properties) if properties.is_object() => Ok(()),
        _ => Err(ReconcileError::RetrievalFailed {
            id: id.to_string(),
            what: "model.Properties",
        }),
    }
}

fn decode_present<K: ResourceKind>(
    id: &ResourceIdentifier,
    payload: &WirePayload,
) -> Result<K::Record, ReconcileError> {
    ensure_properties(id, payload)?;
    K::decode(id, payload)
}
