//! Pure data structures: the flat records each adapter reconciles.
//!
//! Each record implements [`ResourceKind`](crate::framework::ResourceKind) in
//! its adapter module ([`route_table`](crate::route_table),
//! [`packet_capture`](crate::packet_capture),
//! [`network_manager`](crate::network_manager)).

pub mod network_manager;
pub mod packet_capture;
pub mod route_table;

pub use network_manager::*;
pub use packet_capture::*;
pub use route_table::*;
