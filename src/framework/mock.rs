//! # Mock Gateway
//!
//! Utilities for testing controllers and adapters without a control plane.
//!
//! [`MockGateway`] answers from a queue of expectations set up front and
//! panics on the first call that does not match, so a test states exactly
//! which remote calls an operation may make (and in which order).
//!
//! For behavioral tests that need a working store (latency, concurrency,
//! out-of-band deletes) use [`InMemoryGateway`](crate::framework::memory::InMemoryGateway).

use crate::framework::gateway::{GatewayError, RemoteGateway, WirePayload};
use crate::framework::identity::ResourceIdentifier;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected remote call and the answer to give.
#[derive(Debug)]
enum Expectation {
    Get {
        id: ResourceIdentifier,
        response: Result<WirePayload, GatewayError>,
    },
    CreateOrUpdate {
        id: ResourceIdentifier,
        response: Result<WirePayload, GatewayError>,
    },
    Delete {
        id: ResourceIdentifier,
        response: Result<(), GatewayError>,
    },
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// A gateway with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mock = MockGateway::new();
/// mock.expect_get(&id).return_not_found();
/// mock.expect_create_or_update(&id).return_ok(json!({}));
/// mock.expect_get(&id).return_ok(stored);
///
/// let controller = LifecycleController::<HubRouteTable, _>::new(Arc::new(mock.clone()), ..);
/// controller.create(&record, &token).await?;
/// mock.verify();
/// ```
#[derive(Clone, Default)]
pub struct MockGateway {
    expectations: Queue,
    written: Arc<Mutex<Vec<(ResourceIdentifier, WirePayload)>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_get(&self, id: &ResourceIdentifier) -> GetExpectationBuilder {
        GetExpectationBuilder {
            id: id.clone(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_create_or_update(&self, id: &ResourceIdentifier) -> WriteExpectationBuilder {
        WriteExpectationBuilder {
            id: id.clone(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_delete(&self, id: &ResourceIdentifier) -> DeleteExpectationBuilder {
        DeleteExpectationBuilder {
            id: id.clone(),
            expectations: self.expectations.clone(),
        }
    }

    /// Payloads passed to `create_or_update`, in call order.
    pub fn written(&self) -> Vec<(ResourceIdentifier, WirePayload)> {
        self.written.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                exps.len(),
                exps
            );
        }
    }

    fn next(&self, call: &str, id: &ResourceIdentifier) -> Expectation {
        let mut exps = self.expectations.lock().unwrap();
        match exps.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected {call} for {id}: no expectations left"),
        }
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn get(&self, id: &ResourceIdentifier) -> Result<WirePayload, GatewayError> {
        match self.next("get", id) {
            Expectation::Get { id: expected, response } if &expected == id => response,
            other => panic!("Unexpected get for {id}, expected {other:?}"),
        }
    }

    async fn create_or_update(
        &self,
        id: &ResourceIdentifier,
        payload: WirePayload,
    ) -> Result<WirePayload, GatewayError> {
        match self.next("create_or_update", id) {
            Expectation::CreateOrUpdate { id: expected, response } if &expected == id => {
                self.written.lock().unwrap().push((id.clone(), payload));
                response
            }
            other => panic!("Unexpected create_or_update for {id}, expected {other:?}"),
        }
    }

    async fn delete(&self, id: &ResourceIdentifier) -> Result<(), GatewayError> {
        match self.next("delete", id) {
            Expectation::Delete { id: expected, response } if &expected == id => response,
            other => panic!("Unexpected delete for {id}, expected {other:?}"),
        }
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder {
    id: ResourceIdentifier,
    expectations: Queue,
}

impl GetExpectationBuilder {
    pub fn return_ok(self, payload: WirePayload) {
        self.push(Ok(payload));
    }

    pub fn return_not_found(self) {
        self.push(Err(GatewayError::NotFound));
    }

    pub fn return_err(self, error: GatewayError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<WirePayload, GatewayError>) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            id: self.id,
            response,
        });
    }
}

/// Builder for `create_or_update` expectations.
pub struct WriteExpectationBuilder {
    id: ResourceIdentifier,
    expectations: Queue,
}

impl WriteExpectationBuilder {
    pub fn return_ok(self, payload: WirePayload) {
        self.push(Ok(payload));
    }

    pub fn return_err(self, error: GatewayError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<WirePayload, GatewayError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::CreateOrUpdate {
                id: self.id,
                response,
            });
    }
}

/// Builder for `delete` expectations.
pub struct DeleteExpectationBuilder {
    id: ResourceIdentifier,
    expectations: Queue,
}

impl DeleteExpectationBuilder {
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    pub fn return_not_found(self) {
        self.push(Err(GatewayError::NotFound));
    }

    pub fn return_err(self, error: GatewayError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), GatewayError>) {
        self.expectations.lock().unwrap().push_back(Expectation::Delete {
            id: self.id,
            response,
        });
    }
}
