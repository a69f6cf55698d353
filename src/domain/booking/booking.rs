//! Freight booking entity and status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, Timestamp, UserId, ValidationError,
};

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InTransit,
    Delivered,
    Cancelled,
}

impl BookingStatus {
    /// Whether a transition to `next` is allowed.
    ///
    /// Cancellation is allowed from any non-terminal state; otherwise the
    /// status only moves forward.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (Pending, Confirmed) | (Confirmed, InTransit) | (InTransit, Delivered) => true,
            (Pending | Confirmed | InTransit, Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InTransit => "in_transit",
            BookingStatus::Delivered => "delivered",
            BookingStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// A customer's freight booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub reference: String,
    pub status: BookingStatus,
    pub origin: String,
    pub destination: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Creates a new pending booking.
    pub fn new(
        user_id: UserId,
        reference: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ValidationError::empty_field("reference"));
        }
        let origin = origin.into();
        if origin.trim().is_empty() {
            return Err(ValidationError::empty_field("origin"));
        }
        let destination = destination.into();
        if destination.trim().is_empty() {
            return Err(ValidationError::empty_field("destination"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: BookingId::new(),
            user_id,
            reference,
            status: BookingStatus::Pending,
            origin,
            destination,
            created_at: now,
            updated_at: now,
        })
    }

    /// Moves the booking to a new status, enforcing the lifecycle.
    pub fn transition_to(&mut self, next: BookingStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot move booking from {} to {}", self.status, next),
            )
            .with_detail("booking_id", self.id.to_string()));
        }
        self.status = next;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        Booking::new(
            UserId::new("u1").unwrap(),
            "FD-1001",
            "Rotterdam",
            "Hamburg",
        )
        .unwrap()
    }

    #[test]
    fn new_booking_starts_pending() {
        assert_eq!(booking().status, BookingStatus::Pending);
    }

    #[test]
    fn rejects_blank_reference() {
        let result = Booking::new(UserId::new("u1").unwrap(), " ", "A", "B");
        assert!(result.is_err());
    }

    #[test]
    fn happy_path_transitions() {
        let mut b = booking();
        b.transition_to(BookingStatus::Confirmed).unwrap();
        b.transition_to(BookingStatus::InTransit).unwrap();
        b.transition_to(BookingStatus::Delivered).unwrap();
        assert_eq!(b.status, BookingStatus::Delivered);
    }

    #[test]
    fn cannot_skip_confirmation() {
        let mut b = booking();
        let err = b.transition_to(BookingStatus::InTransit).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(b.status, BookingStatus::Pending);
    }

    #[test]
    fn delivered_is_terminal() {
        let mut b = booking();
        b.transition_to(BookingStatus::Confirmed).unwrap();
        b.transition_to(BookingStatus::InTransit).unwrap();
        b.transition_to(BookingStatus::Delivered).unwrap();
        assert!(b.transition_to(BookingStatus::Cancelled).is_err());
    }

    #[test]
    fn can_cancel_in_transit() {
        let mut b = booking();
        b.transition_to(BookingStatus::Confirmed).unwrap();
        b.transition_to(BookingStatus::InTransit).unwrap();
        b.transition_to(BookingStatus::Cancelled).unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&BookingStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
    }
}
