//! Generic reconciliation engine for remote resources.
//!
//! This module provides the building blocks every resource adapter is written
//! against: how ids are parsed, how records map onto wire payloads, how
//! mutations of one container are serialized, and the CRUD driver itself.
//!
//! # Main Components
//!
//! - [`ResourceKind`] - Trait an adapter implements to be driven by the engine
//! - [`LifecycleController`] - Generic Create / Read / Update / Delete driver
//! - [`ResourceIdentifier`] - Parsed id with its [`ParentKey`]
//! - [`LockCoordinator`] - Per-container mutual exclusion
//! - [`RemoteGateway`] - The remote API the engine talks to
//! - [`ReconcileError`] - Common error type
//!
//! # Testing
//!
//! See [`mock`] for an expectation-driven gateway and [`memory`] for a working
//! in-memory one.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod kind;
pub mod lock;
pub mod mapper;
pub mod memory;
pub mod mock;

// Re-export core types for convenience
pub use controller::{LifecycleController, Operation, ReadOutcome, ResourceState, Timeouts};
pub use error::ReconcileError;
pub use gateway::{GatewayError, RemoteGateway, WirePayload};
pub use identity::{IdTemplate, ParentKey, ResourceIdentifier, Segment};
pub use kind::ResourceKind;
pub use lock::{LockCoordinator, ScopedLock};
pub use mapper::{ChangeSet, Discipline, FieldSpec, Mutability};
