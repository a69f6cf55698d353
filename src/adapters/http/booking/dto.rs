//! HTTP DTOs for booking endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingStatus};

/// Request to create a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// Customer-facing booking reference.
    pub reference: String,
    /// Pickup location.
    pub origin: String,
    /// Delivery location.
    pub destination: String,
}

/// Request to move a booking to a new status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// Booking details for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub user_id: String,
    pub reference: String,
    pub status: BookingStatus,
    pub origin: String,
    pub destination: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            user_id: booking.user_id.to_string(),
            reference: booking.reference.clone(),
            status: booking.status,
            origin: booking.origin.clone(),
            destination: booking.destination.clone(),
            created_at: booking.created_at.to_rfc3339(),
            updated_at: booking.updated_at.to_rfc3339(),
        }
    }
}
