//! In-memory booking store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, UserId};
use crate::ports::BookingRepository;

/// RwLock-backed booking store.
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<BookingId, Booking>>,
}

impl InMemoryBookingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingStore {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, DomainError> {
        let bookings = self.bookings.read().await;
        let mut list: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == *user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(user: &str, reference: &str) -> Booking {
        Booking::new(UserId::new(user).unwrap(), reference, "Rotterdam", "Hamburg").unwrap()
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let store = InMemoryBookingStore::new();
        let b = booking("u1", "FD-1001");
        store.save(&b).await.unwrap();
        assert_eq!(store.get(&b.id).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let store = InMemoryBookingStore::new();
        assert_eq!(store.get(&BookingId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_for_user_filters_by_owner() {
        let store = InMemoryBookingStore::new();
        store.save(&booking("u1", "FD-1")).await.unwrap();
        store.save(&booking("u1", "FD-2")).await.unwrap();
        store.save(&booking("u2", "FD-3")).await.unwrap();

        let mine = store.list_for_user(&UserId::new("u1").unwrap()).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|b| b.user_id.as_str() == "u1"));
    }
}
