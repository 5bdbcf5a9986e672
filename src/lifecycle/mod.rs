//! Wiring, configuration and observability.
//!
//! # Main Components
//!
//! - [`Provider`] - Builds every adapter client around one shared gateway and lock coordinator
//! - [`EngineConfig`] - Per-operation timeouts, loadable from JSON
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod config;
pub mod provider;
pub mod tracing;

pub use config::*;
pub use provider::*;
pub use self::tracing::*;
