//! BookingRepository port - Interface to booking persistence.
//!
//! The HTTP handlers validate a request, persist through this port, and then
//! push a corresponding event into the hub as a side effect. The relational
//! schema and query execution behind it are an opaque persistence service.

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, UserId};

/// Port for booking persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts or replaces a booking.
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Fetches a booking by id.
    ///
    /// Returns `None` if the booking does not exist.
    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// Lists all bookings owned by a user, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, DomainError>;
}
