//! Axum router configuration for booking endpoints.

use axum::{
    routing::{post, put},
    Router,
};

use super::handlers::{create_booking, list_bookings, update_booking_status, BookingAppState};

/// Create the booking API router.
///
/// # Routes
///
/// - `POST /` - Create a booking
/// - `GET /` - List the authenticated user's bookings
/// - `PUT /:id/status` - Move a booking through its lifecycle
pub fn booking_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/:id/status", put(update_booking_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_router_creates_routes() {
        let _router = booking_routes();
    }
}
