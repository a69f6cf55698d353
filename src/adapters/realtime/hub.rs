//! Event hub: the single façade application code uses to push events to
//! connected clients.
//!
//! The hub owns one [`ConnectionRegistry`] per channel and hides which
//! channel actually delivers an event. All emits are fire-and-forget: an
//! offline target drops the event silently, a broken recipient is logged and
//! skipped, and no queueing, retry, or ordering machinery exists beyond
//! in-process call order.
//!
//! The hub is constructed once at startup and handed to whoever needs to
//! emit as an `Arc<EventHub>` through axum state; there is no global
//! accessor.

use serde_json::Value;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::{Role, UserId};

use super::events::{EventAction, EventBody, ServerEvent};
use super::registry::{Channel, ConnectedClient, ConnectionRegistry};

/// Fan-out façade over both channel registries.
pub struct EventHub {
    events: ConnectionRegistry,
    notifications: ConnectionRegistry,
}

impl EventHub {
    /// Creates a hub with empty registries for both channels.
    pub fn new() -> Self {
        Self {
            events: ConnectionRegistry::new(Channel::Events),
            notifications: ConnectionRegistry::new(Channel::Notifications),
        }
    }

    /// The registry backing one channel.
    pub fn registry(&self, channel: Channel) -> &ConnectionRegistry {
        match channel {
            Channel::Events => &self.events,
            Channel::Notifications => &self.notifications,
        }
    }

    /// Live connection count for one channel (health endpoint).
    pub async fn connection_count(&self, channel: Channel) -> usize {
        self.registry(channel).connection_count().await
    }

    /// Delivers an event to every live connection the user holds, on either
    /// channel. Silent no-op when the user is offline.
    pub async fn emit_to_user(&self, user_id: &UserId, event: ServerEvent) {
        for registry in [&self.events, &self.notifications] {
            for client in registry.lookup(user_id).await {
                self.deliver(registry.channel(), &client, event.clone());
            }
        }
    }

    /// Delivers an event to every connection registered with the given role.
    pub async fn emit_to_role(&self, role: Role, event: ServerEvent) {
        for registry in [&self.events, &self.notifications] {
            for (_, clients) in registry.all_entries().await {
                for client in clients.iter().filter(|c| c.role == role) {
                    self.deliver(registry.channel(), client, event.clone());
                }
            }
        }
    }

    /// Delivers an event to every live connection across all users.
    pub async fn emit_to_all(&self, event: ServerEvent) {
        for registry in [&self.events, &self.notifications] {
            for (_, clients) in registry.all_entries().await {
                for client in &clients {
                    self.deliver(registry.channel(), client, event.clone());
                }
            }
        }
    }

    /// Queues one event to one connection; a failed recipient never affects
    /// delivery to the others.
    fn deliver(&self, channel: Channel, client: &ConnectedClient, event: ServerEvent) {
        if !client.send(event) {
            tracing::debug!(
                channel = channel.as_str(),
                user_id = %client.user_id,
                connection_id = %client.connection_id,
                "dropping event for closed connection"
            );
        }
    }

    // ============================================
    // Typed convenience wrappers
    // ============================================

    /// A notification was created for the user.
    pub async fn notification_created(&self, user_id: &UserId, data: Value) {
        self.emit_to_user(
            user_id,
            ServerEvent::Notification(EventBody::with_action(EventAction::New, data)),
        )
        .await;
    }

    /// A direct message arrived for the user.
    pub async fn message_created(&self, user_id: &UserId, data: Value) {
        self.emit_to_user(
            user_id,
            ServerEvent::Message(EventBody::with_action(EventAction::New, data)),
        )
        .await;
    }

    /// One of the user's bookings changed.
    pub async fn booking_updated(&self, user_id: &UserId, data: Value) {
        self.emit_to_user(
            user_id,
            ServerEvent::Booking(EventBody::with_action(EventAction::Update, data)),
        )
        .await;
    }

    /// A vehicle assigned to the user changed.
    pub async fn vehicle_updated(&self, user_id: &UserId, data: Value) {
        self.emit_to_user(
            user_id,
            ServerEvent::Vehicle(EventBody::with_action(EventAction::Update, data)),
        )
        .await;
    }

    /// A GPS position ping for a shipment the user is watching.
    pub async fn gps_updated(&self, user_id: &UserId, data: Value) {
        self.emit_to_user(user_id, ServerEvent::Gps(EventBody::bare(data)))
            .await;
    }

    /// The user's dashboard should refresh.
    pub async fn dashboard_updated(&self, user_id: &UserId, data: Value) {
        self.emit_to_user(user_id, ServerEvent::Dashboard(EventBody::bare(data)))
            .await;
    }

    /// The full plan list changed; refresh every connected pricing viewer.
    pub async fn pricing_data_updated(&self, plans: Vec<SubscriptionPlan>) {
        self.emit_to_all(ServerEvent::pricing_data(plans)).await;
    }

    /// An admin edited one plan; refresh every connected pricing viewer.
    pub async fn plan_updated(&self, plan: SubscriptionPlan) {
        self.emit_to_all(ServerEvent::plan_update(plan)).await;
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
