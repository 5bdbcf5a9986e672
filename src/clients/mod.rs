//! Type-safe wrappers around [`LifecycleController`](crate::framework::LifecycleController).

pub mod adapter_client;
pub mod network_manager_client;
pub mod packet_capture_client;
pub mod route_table_client;

pub use adapter_client::*;
pub use network_manager_client::*;
pub use packet_capture_client::*;
pub use route_table_client::*;
