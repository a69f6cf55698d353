//! Booking HTTP module: dto, handlers, and routes.

mod dto;
mod handlers;
mod routes;

pub use dto::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
pub use handlers::{BookingApiError, BookingAppState};
pub use routes::booking_routes;
