//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the
//! `tracing` crate. The library never installs a subscriber itself; binaries
//! call this once at startup.
//!
//! ## Configuration
//!
//! A compact format that hides the module prefix (`with_target(false)`); each
//! operation opens a span named after itself carrying `resource_type` and `id`.
//! Verbosity comes from `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run     # Created / Updated / Deleted, not-found warnings
//! RUST_LOG=debug cargo run    # full records at entry, state transitions
//! RUST_LOG=trace cargo run    # lock claims and releases, every gateway call
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO create_route_table: Sending create_route_table name=rt1
//! INFO create_route_table:create: Created resource_type="azurerm_virtual_hub_route_table" id=/subscriptions/0000/.../hubRouteTables/rt1
//! INFO replace_routes:update: Updated resource_type="azurerm_virtual_hub_route_table" id=/subscriptions/0000/.../hubRouteTables/rt1
//! WARN read:read: azurerm_virtual_hub_route_table /subscriptions/0000/.../hubRouteTables/rt1 was not found - removing from state
//! ```
//!
//! **With `RUST_LOG=debug`**, each client method first logs its full input once
//! (`debug!(?table, "create_route_table called")`) and the controller logs each
//! state transition (`Transition from=Absent to=Creating`).

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // resource_type identifies the adapter
        .compact()
        .init();
}
