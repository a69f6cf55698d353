//! Real-time event distribution over WebSocket.
//!
//! This is the live-update subsystem of the platform: application handlers
//! persist a change, then push a typed event through the [`EventHub`], which
//! fans it out to whichever connections the target users currently hold.
//!
//! Delivery is best-effort by design: no persistence, no replay, no
//! acknowledgements. A user with no live connection simply misses the event
//! and recovers the state through a normal HTTP read on their next page load.
//!
//! Module map:
//! - [`registry`] - per-channel map of live connections with
//!   eviction-on-replace
//! - [`events`] - the JSON wire protocol
//! - [`hub`] - the emit façade handlers call
//! - [`socket`] - axum WebSocket upgrade handling and connection lifecycle

pub mod events;
pub mod hub;
pub mod registry;
pub mod socket;

pub use events::{ClientMessage, EventAction, EventBody, ServerEvent};
pub use hub::EventHub;
pub use registry::{Channel, CloseReason, ConnectedClient, ConnectionRegistry, Outbound};
pub use socket::{realtime_router, register_connection, RealtimeState};
