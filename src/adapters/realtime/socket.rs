//! WebSocket upgrade handler for real-time client connections.
//!
//! Handles the HTTP → WebSocket upgrade and the connection lifecycle:
//! 1. Validate the handshake (`userId` query parameter required)
//! 2. Register in the channel's connection registry (evicting any prior
//!    connection for the same user)
//! 3. Send a `connected` acknowledgement
//! 4. Pump the outbound mailbox to the socket; on the notifications channel,
//!    interleave keep-alive pings
//! 5. Dispatch inbound client messages
//! 6. Remove from the registry on every exit path
//!
//! Two upgrade paths are served: `/ws/events` for general events and
//! `/ws/notifications` for notification delivery with server keep-alive.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::domain::foundation::{Role, UserId};
use crate::ports::PlanReader;

use super::events::{ClientMessage, EventBody, ServerEvent};
use super::hub::EventHub;
use super::registry::{
    Channel, CloseReason, ConnectedClient, ConnectionRegistry, Outbound, OutboundSender,
};

/// State required for WebSocket handling, extracted from the application
/// state at router construction.
#[derive(Clone)]
pub struct RealtimeState {
    pub hub: Arc<EventHub>,
    pub plan_reader: Arc<dyn PlanReader>,
    pub keepalive_interval: Duration,
}

impl RealtimeState {
    /// Creates realtime state from its dependencies.
    pub fn new(
        hub: Arc<EventHub>,
        plan_reader: Arc<dyn PlanReader>,
        keepalive_interval: Duration,
    ) -> Self {
        Self {
            hub,
            plan_reader,
            keepalive_interval,
        }
    }
}

/// Handshake query parameters: `?userId=u1&role=admin`.
#[derive(Debug, Clone, Deserialize)]
pub struct HandshakeQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub role: Option<String>,
}

/// Validates the handshake, returning the registered identity.
///
/// `None` means the connection must be closed with a policy code: a missing
/// or blank `userId` is never registered. An unknown role string degrades to
/// `user` rather than rejecting.
fn validate_handshake(query: &HandshakeQuery) -> Option<(UserId, Role)> {
    let user_id = UserId::new(query.user_id.as_deref()?).ok()?;
    let role = Role::parse_or_default(query.role.as_deref());
    Some((user_id, role))
}

/// Handle WebSocket upgrades for the general events channel.
///
/// Route: `GET /ws/events?userId=...&role=...`
pub async fn events_ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<HandshakeQuery>,
    State(state): State<RealtimeState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, query, state, Channel::Events))
}

/// Handle WebSocket upgrades for the notifications channel.
///
/// Route: `GET /ws/notifications?userId=...&role=...`
pub async fn notifications_ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<HandshakeQuery>,
    State(state): State<RealtimeState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, query, state, Channel::Notifications))
}

/// Runs for the lifetime of one established connection.
async fn handle_socket(
    socket: WebSocket,
    query: HandshakeQuery,
    state: RealtimeState,
    channel: Channel,
) {
    let (mut sink, stream) = socket.split();

    let Some((user_id, role)) = validate_handshake(&query) else {
        tracing::debug!(
            channel = channel.as_str(),
            "rejecting connection without userId"
        );
        let _ = sink
            .send(Message::Close(Some(CloseFrame {
                code: close_code::POLICY,
                reason: "userId required".into(),
            })))
            .await;
        return;
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let registry = state.hub.registry(channel);
    let client = register_connection(registry, user_id.clone(), role, tx.clone()).await;
    let connection_id = client.connection_id;

    tracing::debug!(
        channel = channel.as_str(),
        user_id = %user_id,
        connection_id = %connection_id,
        role = %role,
        "connection registered"
    );

    // Keep-alive only on the notifications channel: idle proxies reclaim
    // long-lived sockets that never carry traffic.
    let keepalive = (channel == Channel::Notifications).then_some(state.keepalive_interval);

    let mut send_task = tokio::spawn(outbound_pump(sink, rx, keepalive));

    let recv_state = state.clone();
    let recv_user = user_id.clone();
    let recv_tx = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        inbound_loop(stream, recv_tx, recv_state, recv_user).await;
    });

    // Whichever side finishes first tears down the other. The pump ends on a
    // close instruction or a dead socket; the inbound loop ends on a client
    // close frame or a receive error.
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    registry.remove(&user_id, &connection_id).await;
    tracing::debug!(
        channel = channel.as_str(),
        user_id = %user_id,
        connection_id = %connection_id,
        "connection removed"
    );
}

/// Registers a connection and queues the `connected` acknowledgement.
///
/// Eviction of a prior connection happens inside `register`, so any
/// `replaced` close instruction is queued to the old mailbox before the new
/// connection's ack is queued here.
pub async fn register_connection(
    registry: &ConnectionRegistry,
    user_id: UserId,
    role: Role,
    tx: OutboundSender,
) -> ConnectedClient {
    let client = registry.register(user_id.clone(), role, tx.clone()).await;
    let _ = tx.send(Outbound::Event(ServerEvent::connected(&user_id, role)));
    client
}

/// Forwards the outbound mailbox to the socket sink, interleaving keep-alive
/// pings when an interval is given.
///
/// The ping timer lives inside this task, so its lifetime is exactly the
/// connection's: normal close, receive error, and eviction all end the task
/// and the timer with it.
async fn outbound_pump(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    keepalive: Option<Duration>,
) {
    let mut ticker = keepalive.map(|period| {
        tokio::time::interval_at(tokio::time::Instant::now() + period, period)
    });

    loop {
        let outbound = match ticker.as_mut() {
            Some(ticker) => tokio::select! {
                queued = rx.recv() => queued,
                _ = ticker.tick() => Some(Outbound::Event(ServerEvent::ping())),
            },
            None => rx.recv().await,
        };

        match outbound {
            Some(Outbound::Event(event)) => {
                if let Err(e) = send_event(&mut sink, &event).await {
                    tracing::debug!("send error, closing connection: {}", e);
                    break;
                }
            }
            Some(Outbound::Close(reason)) => {
                let code = match reason {
                    CloseReason::Replaced => close_code::NORMAL,
                    CloseReason::PolicyViolation => close_code::POLICY,
                };
                let _ = sink
                    .send(Message::Close(Some(CloseFrame {
                        code,
                        reason: reason.as_str().into(),
                    })))
                    .await;
                break;
            }
            // All senders dropped: the connection is being torn down.
            None => break,
        }
    }
}

/// Serializes and writes one event frame.
async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).expect("ServerEvent serialization should not fail");
    sink.send(Message::Text(json)).await
}

/// Reads frames from the client until close or error.
async fn inbound_loop(
    mut stream: futures::stream::SplitStream<WebSocket>,
    tx: OutboundSender,
    state: RealtimeState,
    user_id: UserId,
) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_client_message(&text, &tx, state.plan_reader.as_ref(), &user_id).await;
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!(user_id = %user_id, "ignoring unsupported binary message");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Protocol-level frames handled by axum.
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(user_id = %user_id, "client sent close frame");
                break;
            }
            Err(e) => {
                tracing::debug!(user_id = %user_id, "receive error: {}", e);
                break;
            }
        }
    }
}

/// Dispatches one inbound text frame on its `type` field.
///
/// Unrecognized types are logged and ignored; they are not errors.
async fn handle_client_message(
    text: &str,
    tx: &OutboundSender,
    plan_reader: &dyn PlanReader,
    user_id: &UserId,
) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::DashboardRegister { dashboard }) => {
            tracing::debug!(user_id = %user_id, dashboard = %dashboard, "dashboard registered");
            let ack = ServerEvent::Dashboard(EventBody::bare(serde_json::json!({
                "dashboard": dashboard,
                "registered": true,
            })));
            let _ = tx.send(Outbound::Event(ack));
        }
        Ok(ClientMessage::RequestPricingData) => {
            // Read at call time; pricing replies are never cached.
            match plan_reader.list_plans().await {
                Ok(plans) => {
                    let _ = tx.send(Outbound::Event(ServerEvent::pricing_data(plans)));
                }
                Err(e) => {
                    tracing::warn!(user_id = %user_id, "failed to load plans: {}", e);
                    let _ = tx.send(Outbound::Event(ServerEvent::error(
                        "PRICING_UNAVAILABLE",
                        "Could not load pricing data",
                    )));
                }
            }
        }
        Err(e) => {
            tracing::debug!(user_id = %user_id, "ignoring unrecognized client message: {}", e);
        }
    }
}

/// Create the axum router for both WebSocket upgrade paths.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(realtime_router().with_state(realtime_state));
/// ```
pub fn realtime_router() -> Router<RealtimeState> {
    Router::new()
        .route("/ws/events", get(events_ws_handler))
        .route("/ws/notifications", get(notifications_ws_handler))
}
