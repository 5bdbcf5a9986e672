//! # Remote Gateway
//!
//! The narrow interface the engine uses to talk to the control plane. HTTP,
//! authentication, retries, pagination and long-running-operation polling all
//! live behind this trait; the engine only sees finished results.

use crate::framework::identity::ResourceIdentifier;
use async_trait::async_trait;

/// The nested structure exchanged with the remote API.
pub type WirePayload = serde_json::Value;

/// Errors reported by a [`RemoteGateway`].
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum GatewayError {
    /// The remote API answered 404 (or its equivalent) for the id.
    #[error("resource not found")]
    NotFound,

    /// Any other failure. `transient` is informational: the engine never retries.
    #[error("remote request failed (status {status:?}): {message}")]
    Remote {
        status: Option<u16>,
        message: String,
        transient: bool,
    },
}

impl GatewayError {
    pub fn remote(status: Option<u16>, message: impl Into<String>, transient: bool) -> Self {
        Self::Remote {
            status,
            message: message.into(),
            transient,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Get / CreateOrUpdate / Delete against a named resource path.
///
/// `create_or_update` and `delete` may be long-running remotely; an
/// implementation returns only once the operation has reached a terminal state.
#[async_trait]
pub trait RemoteGateway: Send + Sync + 'static {
    async fn get(&self, id: &ResourceIdentifier) -> Result<WirePayload, GatewayError>;

    async fn create_or_update(
        &self,
        id: &ResourceIdentifier,
        payload: WirePayload,
    ) -> Result<WirePayload, GatewayError>;

    async fn delete(&self, id: &ResourceIdentifier) -> Result<(), GatewayError>;
}
