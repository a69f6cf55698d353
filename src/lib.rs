//! Freightdesk - multi-tenant logistics SaaS backend.
//!
//! Bookings, subscription billing, and the real-time event distribution
//! layer that keeps connected browser clients current: handlers persist a
//! change through a repository port, then push a typed event into the
//! [`adapters::realtime::EventHub`], which fans it out to live WebSocket
//! connections by user, role, or broadcast.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
