//! # In-Memory Gateway
//!
//! A [`RemoteGateway`] backed by a map, for the demo binary and for behavioral
//! tests. Writes take a configurable latency and every completed call is
//! recorded with its start and end instant, so tests can check how calls on the
//! same container interleave.
//!
//! Stored payloads get what a real control plane would add: `id`, `name`, an
//! `etag` bumped on each write and `properties.provisioningState`.

use crate::framework::gateway::{GatewayError, RemoteGateway, WirePayload};
use crate::framework::identity::{ParentKey, ResourceIdentifier};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayCall {
    Get,
    CreateOrUpdate,
    Delete,
}

/// One completed gateway call.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub call: GatewayCall,
    pub id: ResourceIdentifier,
    pub parent: ParentKey,
    pub started: Instant,
    pub finished: Instant,
}

impl CallRecord {
    pub fn overlaps(&self, other: &CallRecord) -> bool {
        self.started < other.finished && other.started < self.finished
    }
}

#[derive(Default)]
struct Store {
    objects: HashMap<String, WirePayload>,
    generation: u64,
    calls: Vec<CallRecord>,
    failures: VecDeque<(GatewayCall, GatewayError)>,
}

#[derive(Default)]
pub struct InMemoryGateway {
    store: Mutex<Store>,
    latency: Duration,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Stores `payload` as is, bypassing the usual server-side stamping.
    pub fn insert_raw(&self, id: &ResourceIdentifier, payload: WirePayload) {
        self.store().objects.insert(key(id), payload);
    }

    /// Deletes an object out of band.
    pub fn remove(&self, id: &ResourceIdentifier) -> Option<WirePayload> {
        self.store().objects.remove(&key(id))
    }

    pub fn stored(&self, id: &ResourceIdentifier) -> Option<WirePayload> {
        self.store().objects.get(&key(id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.store().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes the next call of kind `call` fail with `error`.
    pub fn fail_next(&self, call: GatewayCall, error: GatewayError) {
        self.store().failures.push_back((call, error));
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.store().calls.clone()
    }

    pub fn calls_of(&self, call: GatewayCall) -> Vec<CallRecord> {
        self.store()
            .calls
            .iter()
            .filter(|record| record.call == call)
            .cloned()
            .collect()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn injected(&self, call: GatewayCall) -> Option<GatewayError> {
        let mut store = self.store();
        let position = store.failures.iter().position(|(c, _)| *c == call)?;
        store.failures.remove(position).map(|(_, error)| error)
    }

    async fn enter(&self, call: GatewayCall, id: &ResourceIdentifier) -> Result<Instant, GatewayError> {
        let started = Instant::now();
        trace!(?call, %id, "Gateway call");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.injected(call) {
            Some(error) => Err(error),
            None => Ok(started),
        }
    }

    fn record(&self, call: GatewayCall, id: &ResourceIdentifier, started: Instant) {
        self.store().calls.push(CallRecord {
            call,
            id: id.clone(),
            parent: id.parent_key(),
            started,
            finished: Instant::now(),
        });
    }
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn get(&self, id: &ResourceIdentifier) -> Result<WirePayload, GatewayError> {
        let started = self.enter(GatewayCall::Get, id).await?;
        let found = self.store().objects.get(&key(id)).cloned();
        self.record(GatewayCall::Get, id, started);
        found.ok_or(GatewayError::NotFound)
    }

    async fn create_or_update(
        &self,
        id: &ResourceIdentifier,
        payload: WirePayload,
    ) -> Result<WirePayload, GatewayError> {
        let started = self.enter(GatewayCall::CreateOrUpdate, id).await?;
        let Value::Object(mut object) = payload else {
            return Err(GatewayError::remote(
                Some(400),
                format!("request body for {id} must be an object"),
                false,
            ));
        };

        let stored = {
            let mut store = self.store();
            store.generation += 1;
            object.insert("id".into(), json!(id.to_string()));
            object.insert("name".into(), json!(id.name()));
            object.insert("etag".into(), json!(format!("W/\"{}\"", store.generation)));
            let properties = object
                .entry("properties")
                .or_insert_with(|| json!({}));
            if let Value::Object(properties) = properties {
                properties.insert("provisioningState".into(), json!("Succeeded"));
            }
            let stored = Value::Object(object);
            store.objects.insert(key(id), stored.clone());
            stored
        };
        self.record(GatewayCall::CreateOrUpdate, id, started);
        Ok(stored)
    }

    async fn delete(&self, id: &ResourceIdentifier) -> Result<(), GatewayError> {
        let started = self.enter(GatewayCall::Delete, id).await?;
        let removed = self.store().objects.remove(&key(id));
        self.record(GatewayCall::Delete, id, started);
        removed.map(|_| ()).ok_or(GatewayError::NotFound)
    }
}

fn key(id: &ResourceIdentifier) -> String {
    id.to_string().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::identity::templates::VIRTUAL_HUB;

    fn hub(name: &str) -> ResourceIdentifier {
        ResourceIdentifier::build(&VIRTUAL_HUB, &["0000", "rg1", name]).unwrap()
    }

    #[tokio::test]
    async fn test_write_stamps_server_fields() {
        let gateway = InMemoryGateway::new();
        let stored = gateway
            .create_or_update(&hub("hub1"), json!({ "properties": { "labels": ["a"] } }))
            .await
            .unwrap();

        assert_eq!(stored["name"], "hub1");
        assert_eq!(stored["properties"]["provisioningState"], "Succeeded");
        assert_eq!(stored["properties"]["labels"], json!(["a"]));
        assert_eq!(gateway.get(&hub("HUB1")).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_missing_objects_are_not_found() {
        let gateway = InMemoryGateway::new();
        assert_eq!(gateway.get(&hub("hub1")).await, Err(GatewayError::NotFound));
        assert_eq!(gateway.delete(&hub("hub1")).await, Err(GatewayError::NotFound));
    }

    #[tokio::test]
    async fn test_injected_failure_applies_once() {
        let gateway = InMemoryGateway::new();
        gateway.insert_raw(&hub("hub1"), json!({ "properties": {} }));
        gateway.fail_next(GatewayCall::Get, GatewayError::remote(Some(503), "busy", true));

        assert!(matches!(
            gateway.get(&hub("hub1")).await,
            Err(GatewayError::Remote { transient: true, .. })
        ));
        assert!(gateway.get(&hub("hub1")).await.is_ok());
        assert_eq!(gateway.calls_of(GatewayCall::Get).len(), 1);
    }

    #[tokio::test]
    async fn test_calls_record_their_interval() {
        let gateway = InMemoryGateway::new().with_latency(Duration::from_millis(20));
        gateway.create_or_update(&hub("hub1"), json!({})).await.unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].finished - calls[0].started >= Duration::from_millis(20));
        assert_eq!(calls[0].parent, hub("hub1").parent_key());
    }
}
