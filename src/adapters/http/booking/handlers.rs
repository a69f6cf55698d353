//! HTTP handlers for booking endpoints.
//!
//! Handlers validate, persist through the repository port, and then push the
//! corresponding event into the hub from a deferred task — the emit happens
//! after the response is produced and its outcome never changes the HTTP
//! result.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::adapters::realtime::EventHub;
use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, ErrorCode, Role};
use crate::ports::BookingRepository;

use super::super::{AuthenticatedUser, ErrorResponse};
use super::dto::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};

/// Booking API error that implements IntoResponse.
#[derive(Debug)]
pub enum BookingApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for BookingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            BookingApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            BookingApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
            BookingApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<DomainError> for BookingApiError {
    fn from(error: DomainError) -> Self {
        match error.code {
            ErrorCode::BookingNotFound => BookingApiError::NotFound(error.message),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::InvalidFormat
            | ErrorCode::InvalidStateTransition => BookingApiError::BadRequest(error.message),
            _ => BookingApiError::Internal(error.message),
        }
    }
}

/// Shared state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub bookings: Arc<dyn BookingRepository>,
    pub hub: Arc<EventHub>,
}

/// `POST /bookings` - create a booking for the authenticated user.
pub async fn create_booking(
    State(state): State<BookingAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), BookingApiError> {
    let booking = Booking::new(
        user.user_id,
        request.reference,
        request.origin,
        request.destination,
    )
    .map_err(DomainError::from)?;

    state.bookings.save(&booking).await?;

    let response = BookingResponse::from(&booking);
    spawn_booking_emit(state.hub, booking, true);

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /bookings` - list the authenticated user's bookings, newest first.
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<BookingResponse>>, BookingApiError> {
    let bookings = state.bookings.list_for_user(&user.user_id).await?;
    Ok(Json(bookings.iter().map(BookingResponse::from).collect()))
}

/// `PUT /bookings/:id/status` - move a booking through its lifecycle.
pub async fn update_booking_status(
    State(state): State<BookingAppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, BookingApiError> {
    let id: BookingId = id
        .parse()
        .map_err(|_| BookingApiError::BadRequest("Invalid booking ID".to_string()))?;

    let mut booking = state
        .bookings
        .get(&id)
        .await?
        .ok_or_else(|| BookingApiError::from(DomainError::booking_not_found(id)))?;

    booking.transition_to(request.status)?;
    state.bookings.save(&booking).await?;

    let response = BookingResponse::from(&booking);
    spawn_booking_emit(state.hub, booking, false);

    Ok(Json(response))
}

/// Pushes the booking event (and an admin dashboard nudge) from a deferred
/// task, after the handler has already produced its response.
fn spawn_booking_emit(hub: Arc<EventHub>, booking: Booking, created: bool) {
    tokio::spawn(async move {
        let payload = json!({
            "id": booking.id.to_string(),
            "reference": booking.reference,
            "status": booking.status,
            "origin": booking.origin,
            "destination": booking.destination,
        });

        if created {
            hub.emit_to_user(
                &booking.user_id,
                crate::adapters::realtime::ServerEvent::Booking(
                    crate::adapters::realtime::EventBody::with_action(
                        crate::adapters::realtime::EventAction::New,
                        payload.clone(),
                    ),
                ),
            )
            .await;
        } else {
            hub.booking_updated(&booking.user_id, payload.clone()).await;
        }

        // Admin dashboards track every booking movement.
        hub.emit_to_role(
            Role::Admin,
            crate::adapters::realtime::ServerEvent::Dashboard(
                crate::adapters::realtime::EventBody::bare(json!({
                    "booking_id": booking.id.to_string(),
                    "status": booking.status,
                })),
            ),
        )
        .await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::InMemoryBookingStore;
    use crate::adapters::realtime::{Channel, Outbound};
    use crate::domain::booking::BookingStatus;
    use crate::domain::foundation::UserId;
    use tokio::sync::mpsc;

    fn state() -> BookingAppState {
        BookingAppState {
            bookings: Arc::new(InMemoryBookingStore::new()),
            hub: Arc::new(EventHub::new()),
        }
    }

    fn auth(user: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId::new(user).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_booking_persists_and_returns_created() {
        let state = state();
        let (status, Json(response)) = create_booking(
            State(state.clone()),
            auth("u1"),
            Json(CreateBookingRequest {
                reference: "FD-1001".to_string(),
                origin: "Rotterdam".to_string(),
                destination: "Hamburg".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.status, BookingStatus::Pending);

        let stored = state
            .bookings
            .get(&response.id.parse().unwrap())
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn create_booking_rejects_blank_reference() {
        let result = create_booking(
            State(state()),
            auth("u1"),
            Json(CreateBookingRequest {
                reference: "  ".to_string(),
                origin: "Rotterdam".to_string(),
                destination: "Hamburg".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(BookingApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn update_status_emits_booking_update_to_owner() {
        let state = state();

        // Owner is connected on the events channel.
        let (tx, mut rx) = mpsc::unbounded_channel();
        state
            .hub
            .registry(Channel::Events)
            .register(UserId::new("u1").unwrap(), Role::User, tx)
            .await;

        let (_, Json(created)) = create_booking(
            State(state.clone()),
            auth("u1"),
            Json(CreateBookingRequest {
                reference: "FD-1001".to_string(),
                origin: "Rotterdam".to_string(),
                destination: "Hamburg".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(updated) = update_booking_status(
            State(state.clone()),
            Path(created.id.clone()),
            Json(UpdateBookingStatusRequest {
                status: BookingStatus::Confirmed,
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);

        // The deferred emits land after the response; wait for both events.
        let mut seen = Vec::new();
        for _ in 0..2 {
            match tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv()).await {
                Ok(Some(Outbound::Event(event))) => seen.push(event.event_type()),
                other => panic!("expected event, got {:?}", other),
            }
        }
        assert!(seen.contains(&"booking"));
    }

    #[tokio::test]
    async fn update_status_rejects_invalid_transition() {
        let state = state();
        let (_, Json(created)) = create_booking(
            State(state.clone()),
            auth("u1"),
            Json(CreateBookingRequest {
                reference: "FD-1001".to_string(),
                origin: "Rotterdam".to_string(),
                destination: "Hamburg".to_string(),
            }),
        )
        .await
        .unwrap();

        let result = update_booking_status(
            State(state),
            Path(created.id),
            Json(UpdateBookingStatusRequest {
                status: BookingStatus::Delivered,
            }),
        )
        .await;
        assert!(matches!(result, Err(BookingApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn update_status_unknown_booking_is_not_found() {
        let result = update_booking_status(
            State(state()),
            Path(BookingId::new().to_string()),
            Json(UpdateBookingStatusRequest {
                status: BookingStatus::Confirmed,
            }),
        )
        .await;
        assert!(matches!(result, Err(BookingApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_bookings_returns_only_own() {
        let state = state();
        for (user, reference) in [("u1", "FD-1"), ("u2", "FD-2")] {
            create_booking(
                State(state.clone()),
                auth(user),
                Json(CreateBookingRequest {
                    reference: reference.to_string(),
                    origin: "A".to_string(),
                    destination: "B".to_string(),
                }),
            )
            .await
            .unwrap();
        }

        let Json(mine) = list_bookings(State(state), auth("u1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].reference, "FD-1");
    }
}
