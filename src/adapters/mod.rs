//! Adapters - Concrete implementations at the edges of the system.
//!
//! - `realtime` - WebSocket event distribution (registry, hub, socket)
//! - `http` - REST handlers in front of the domain
//! - `persistence` - in-memory implementations of the persistence ports

pub mod http;
pub mod persistence;
pub mod realtime;
