//! Foundation value objects shared across the domain.
//!
//! These are the building blocks every other module depends on: identifiers,
//! timestamps, roles, and the domain error types.

mod errors;
mod ids;
mod role;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BookingId, ConnectionId, PlanId, UserId};
pub use role::Role;
pub use timestamp::Timestamp;
