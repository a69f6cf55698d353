//! Booking domain: freight bookings and their status lifecycle.

mod booking;

pub use booking::{Booking, BookingStatus};
