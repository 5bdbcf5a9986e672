//! # ARM Reconciler
//!
//! > **A generic lifecycle engine for remote cloud resources.**
//!
//! This crate takes a declared record (a route table, a packet capture, a
//! network manager) and drives the matching object in a remote control plane
//! through Create / Read / Update / Delete. It parses and builds opaque resource
//! ids, maps between flat records and nested wire payloads, and serializes
//! mutations that share a parent container.
//!
//! ## Core Concepts
//!
//! ### Generics: one controller, many kinds
//! You'll see `LifecycleController<K: ResourceKind, G: RemoteGateway>` everywhere.
//! The existence check, lock, read-modify-write and re-read are written
//! **once**; an adapter only declares its id template, its field table and a
//! pair of mapping functions.
//!
//! ### Read-modify-write, not replace
//! An update reads the current payload, copies in only the fields named by a
//! [`ChangeSet`](framework::ChangeSet), and writes the result back. Remote fields
//! the adapter does not model survive untouched.
//!
//! ### Parent locks
//! Children of one container (route tables of a hub, captures of a watcher) are
//! written through that container. Each mutation holds a
//! [`ParentKey`](framework::ParentKey) lock from the [`LockCoordinator`](framework::LockCoordinator);
//! distinct containers proceed in parallel.
//!
//! ### Mocking
//! [`framework::mock::MockGateway`] scripts exact remote calls;
//! [`framework::memory::InMemoryGateway`] is a working store with latency and
//! call recording for concurrency tests.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Identity codec, field mapper, lock coordinator and lifecycle controller.
//! - **Key items**: [`ResourceKind`](framework::ResourceKind), [`LifecycleController`](framework::LifecycleController).
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! - **Role**: Wires gateway, locks and configuration into the clients.
//! - **Key items**: [`Provider`](lifecycle::Provider), [`EngineConfig`](lifecycle::EngineConfig).
//!
//! ### 3. The Interface ([`clients`])
//! - **Role**: Adapter-specific clients over the generic controller.
//! - **Key items**: [`RouteTableClient`](clients::RouteTableClient), [`AdapterClient`](clients::AdapterClient).
//!
//! ### 4. The Implementation ([`route_table`], [`packet_capture`], [`network_manager`])
//! - **Role**: Concrete implementations of the `ResourceKind` trait over the records in [`model`].
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod network_manager;
pub mod packet_capture;
pub mod route_table;
