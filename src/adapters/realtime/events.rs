//! Wire protocol for real-time client connections.
//!
//! Defines the JSON envelope exchanged with connected browsers:
//! - Server → Client: connection ack, domain events, pricing payloads,
//!   keep-alive pings, errors
//! - Client → Server: dashboard registration, pricing data requests
//!
//! Every server event serializes as
//! `{ "type": <string>, "action"?: "new"|"update", "data"?: ..., "timestamp": <RFC 3339> }`
//! with `pricing_data_update` carrying `plans` and `plan_update` carrying
//! `plan` instead of `data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::{Role, Timestamp, UserId};

// ============================================
// Server → Client Events
// ============================================

/// All events that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Connection established and registered.
    Connected(ConnectedBody),

    /// A notification was created for this user.
    Notification(EventBody),

    /// A direct message arrived.
    Message(EventBody),

    /// A booking changed.
    Booking(EventBody),

    /// A fleet vehicle changed.
    Vehicle(EventBody),

    /// A GPS position ping for a tracked vehicle.
    Gps(EventBody),

    /// The admin dashboard should refresh.
    Dashboard(EventBody),

    /// Full plan list, sent on request or when pricing changes.
    PricingDataUpdate(PricingDataBody),

    /// A single plan was edited by an admin.
    PlanUpdate(PlanUpdateBody),

    /// Server-initiated keep-alive.
    Ping(PingBody),

    /// Error reply to a client request.
    Error(ErrorBody),
}

impl ServerEvent {
    /// Connection acknowledgement with the registered identity.
    pub fn connected(user_id: &UserId, role: Role) -> Self {
        ServerEvent::Connected(ConnectedBody {
            user_id: user_id.clone(),
            role,
            timestamp: Timestamp::now(),
        })
    }

    /// Keep-alive ping.
    pub fn ping() -> Self {
        ServerEvent::Ping(PingBody {
            timestamp: Timestamp::now(),
        })
    }

    /// Error reply with a stable code and human-readable message.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorBody {
            code: code.into(),
            message: message.into(),
            timestamp: Timestamp::now(),
        })
    }

    /// Full pricing payload.
    pub fn pricing_data(plans: Vec<SubscriptionPlan>) -> Self {
        ServerEvent::PricingDataUpdate(PricingDataBody {
            plans,
            timestamp: Timestamp::now(),
        })
    }

    /// Single-plan edit payload.
    pub fn plan_update(plan: SubscriptionPlan) -> Self {
        ServerEvent::PlanUpdate(PlanUpdateBody {
            plan,
            timestamp: Timestamp::now(),
        })
    }

    /// Wire name of the event, for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            ServerEvent::Connected(_) => "connected",
            ServerEvent::Notification(_) => "notification",
            ServerEvent::Message(_) => "message",
            ServerEvent::Booking(_) => "booking",
            ServerEvent::Vehicle(_) => "vehicle",
            ServerEvent::Gps(_) => "gps",
            ServerEvent::Dashboard(_) => "dashboard",
            ServerEvent::PricingDataUpdate(_) => "pricing_data_update",
            ServerEvent::PlanUpdate(_) => "plan_update",
            ServerEvent::Ping(_) => "ping",
            ServerEvent::Error(_) => "error",
        }
    }
}

/// Sent when a client successfully connects and is registered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedBody {
    pub user_id: UserId,
    pub role: Role,
    pub timestamp: Timestamp,
}

/// Whether a domain event describes a creation or an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    New,
    Update,
}

/// Common body for domain events: optional action, entity payload, timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct EventBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<EventAction>,
    pub data: Value,
    pub timestamp: Timestamp,
}

impl EventBody {
    /// Body with an explicit action.
    pub fn with_action(action: EventAction, data: Value) -> Self {
        Self {
            action: Some(action),
            data,
            timestamp: Timestamp::now(),
        }
    }

    /// Body without an action (e.g. GPS pings, dashboard nudges).
    pub fn bare(data: Value) -> Self {
        Self {
            action: None,
            data,
            timestamp: Timestamp::now(),
        }
    }
}

/// Full plan list payload.
#[derive(Debug, Clone, Serialize)]
pub struct PricingDataBody {
    pub plans: Vec<SubscriptionPlan>,
    pub timestamp: Timestamp,
}

/// Single edited plan payload.
#[derive(Debug, Clone, Serialize)]
pub struct PlanUpdateBody {
    pub plan: SubscriptionPlan,
    pub timestamp: Timestamp,
}

/// Keep-alive body.
#[derive(Debug, Clone, Serialize)]
pub struct PingBody {
    pub timestamp: Timestamp,
}

/// Error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub timestamp: Timestamp,
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types accepted from clients.
///
/// Anything that fails to deserialize into one of these is logged and
/// ignored; an unrecognized type is not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Register interest in a named dashboard. Acknowledged, no state change.
    DashboardRegister { dashboard: String },

    /// Request the full current plan list.
    RequestPricingData,
}
