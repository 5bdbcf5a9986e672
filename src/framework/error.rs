//! # Engine Errors
//!
//! This module defines the error taxonomy shared by every lifecycle operation.
//! By centralizing the definitions, each adapter reports failures the same way
//! and callers can pattern match without knowing which resource kind failed.
//!
//! | Kind | Raised before any remote call? | Remote state touched? |
//! |------|--------------------------------|-----------------------|
//! | `MalformedIdentifier` | yes | no |
//! | `ConflictingVariant` / `Mapping` | yes (on update, after the read) | no |
//! | `ImmutableField` | yes | no |
//! | `AlreadyExists` | after a read, before any write | no |
//! | `RetrievalFailed` | after a read | no |
//! | `Gone` | after a read | no |
//! | `Remote` | passed through from the gateway | whatever the gateway did |

use crate::framework::gateway::GatewayError;

/// Errors produced by the reconciliation engine.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ReconcileError {
    /// The raw id does not match the template for the resource kind.
    #[error("parsing {kind} ID {raw:?}: {reason}")]
    MalformedIdentifier {
        kind: &'static str,
        raw: String,
        reason: String,
    },

    /// Create found an existing object. The adapter should import it instead.
    #[error("a resource with the ID {id:?} already exists - to be managed via Terraform this resource needs to be imported into the State. Please see the resource documentation for {resource_type} for more information")]
    AlreadyExists {
        resource_type: &'static str,
        id: String,
    },

    /// A one-of block had more than one variant set.
    #[error("{block}: only one of {variants:?} can be set")]
    ConflictingVariant {
        block: &'static str,
        variants: Vec<&'static str>,
    },

    /// The remote payload (or its `properties`) was missing on a read that must succeed.
    #[error("retrieving existing {id}: `{what}` was nil")]
    RetrievalFailed { id: String, what: &'static str },

    /// The object no longer exists remotely.
    #[error("{id} was not found")]
    Gone { id: String },

    /// An update tried to change a field the remote API only sets on creation.
    #[error("{field} cannot be changed in place for {id}; the resource must be replaced")]
    ImmutableField { id: String, field: &'static str },

    /// The wire payload could not be mapped to or from the record.
    #[error("mapping {resource_type}: {reason}")]
    Mapping {
        resource_type: &'static str,
        reason: String,
    },

    /// The operation's cancellation token fired.
    #[error("{operation} of {id} was cancelled")]
    Cancelled { operation: &'static str, id: String },

    /// The operation ran past its configured timeout.
    #[error("{operation} of {id} did not complete within {seconds}s")]
    DeadlineExceeded {
        operation: &'static str,
        id: String,
        seconds: u64,
    },

    /// Whatever the remote gateway reported, unchanged.
    #[error(transparent)]
    Remote(#[from] GatewayError),
}

impl ReconcileError {
    pub fn malformed(kind: &'static str, raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            kind,
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn mapping(resource_type: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Mapping {
            resource_type,
            reason: reason.to_string(),
        }
    }

    /// `Gone` is an expected reconciliation outcome rather than a failure.
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Gone { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_message_points_at_import() {
        let err = ReconcileError::AlreadyExists {
            resource_type: "azurerm_virtual_hub_route_table",
            id: "/subscriptions/s/resourceGroups/rg".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("needs to be imported"));
        assert!(msg.contains("azurerm_virtual_hub_route_table"));
    }

    #[test]
    fn test_remote_errors_pass_through_verbatim() {
        let inner = GatewayError::remote(Some(429), "too many requests", true);
        let err: ReconcileError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err, ReconcileError::Remote(inner));
    }

    #[test]
    fn test_only_gone_is_gone() {
        assert!(ReconcileError::Gone { id: "x".into() }.is_gone());
        assert!(!ReconcileError::malformed("k", "x", "bad").is_gone());
    }
}
