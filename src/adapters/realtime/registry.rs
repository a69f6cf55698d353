//! Connection registry: which transport connection currently represents
//! "this user is online".
//!
//! One registry exists per channel. Registering a connection for a user
//! evicts and closes any prior connection for that user on the same channel;
//! eviction never blocks the new registration. Removal is idempotent and
//! deletes the user's map entry entirely once their last connection is gone,
//! so the map does not grow with disconnected users.
//!
//! # Thread Safety
//!
//! The evict-then-insert sequence in `register` runs under a single write
//! lock, so two near-simultaneous registrations for the same user are
//! serialized in lock-acquisition order.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::{ConnectionId, Role, UserId};

use super::events::ServerEvent;

/// Which upgrade path a connection arrived on.
///
/// The two channels track connections independently; a user may hold one
/// live connection on each at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// General events path (`/ws/events`).
    Events,
    /// Notifications path (`/ws/notifications`), with server keep-alive.
    Notifications,
}

impl Channel {
    /// Lowercase name for logging and the health endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Events => "events",
            Channel::Notifications => "notifications",
        }
    }
}

/// Why the server is closing a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// A newer connection for the same user superseded this one.
    Replaced,
    /// The handshake violated policy (missing user identity).
    PolicyViolation,
}

impl CloseReason {
    /// Reason string carried in the close frame.
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::Replaced => "replaced",
            CloseReason::PolicyViolation => "policy_violation",
        }
    }
}

/// Instruction queued to a connection's outbound mailbox.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// Serialize and write this event.
    Event(ServerEvent),
    /// Send a close frame with the given reason and end the connection.
    Close(CloseReason),
}

/// Sender half of a connection's outbound mailbox.
pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

/// A live registered connection for one user.
#[derive(Debug, Clone)]
pub struct ConnectedClient {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub role: Role,
    sender: OutboundSender,
}

impl ConnectedClient {
    /// Queues an event to this connection.
    ///
    /// Returns `false` if the connection's mailbox is gone (socket task has
    /// exited); the caller logs and moves on.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.sender.send(Outbound::Event(event)).is_ok()
    }

    /// Queues a close instruction to this connection.
    pub fn close(&self, reason: CloseReason) -> bool {
        self.sender.send(Outbound::Close(reason)).is_ok()
    }
}

/// Tracks live connections for one channel, keyed by user.
///
/// Values are kept as a vec for fan-out iteration, but the eviction policy
/// in `register` holds each user to at most one live connection.
pub struct ConnectionRegistry {
    channel: Channel,
    connections: RwLock<HashMap<UserId, Vec<ConnectedClient>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry for a channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// The channel this registry tracks.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Registers a new connection for a user, evicting any prior one.
    ///
    /// Existing connections are told to close with a `replaced` reason before
    /// the new connection is inserted; a close failure (mailbox already gone)
    /// is logged and swallowed. Registration itself never fails.
    pub async fn register(
        &self,
        user_id: UserId,
        role: Role,
        sender: OutboundSender,
    ) -> ConnectedClient {
        let client = ConnectedClient {
            connection_id: ConnectionId::new(),
            user_id: user_id.clone(),
            role,
            sender,
        };

        let mut connections = self.connections.write().await;
        if let Some(existing) = connections.remove(&user_id) {
            for old in existing {
                tracing::debug!(
                    channel = self.channel.as_str(),
                    user_id = %user_id,
                    connection_id = %old.connection_id,
                    "evicting superseded connection"
                );
                if !old.close(CloseReason::Replaced) {
                    tracing::debug!(
                        channel = self.channel.as_str(),
                        user_id = %user_id,
                        connection_id = %old.connection_id,
                        "evicted connection already closed"
                    );
                }
            }
        }
        connections.insert(user_id, vec![client.clone()]);

        client
    }

    /// Removes a connection if it is still the registered one.
    ///
    /// Idempotent: removing an already-removed connection is a no-op. When a
    /// user's last connection goes, the map entry is deleted entirely.
    pub async fn remove(&self, user_id: &UserId, connection_id: &ConnectionId) {
        let mut connections = self.connections.write().await;
        if let Some(entries) = connections.get_mut(user_id) {
            entries.retain(|c| c.connection_id != *connection_id);
            if entries.is_empty() {
                connections.remove(user_id);
            }
        }
    }

    /// Returns the live connections for a user, empty if none.
    pub async fn lookup(&self, user_id: &UserId) -> Vec<ConnectedClient> {
        self.connections
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of every registered user and their connections.
    ///
    /// Used for role-targeted and broadcast fan-out.
    pub async fn all_entries(&self) -> Vec<(UserId, Vec<ConnectedClient>)> {
        self.connections
            .read()
            .await
            .iter()
            .map(|(user_id, clients)| (user_id.clone(), clients.clone()))
            .collect()
    }

    /// Total live connections on this channel.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn mailbox() -> (OutboundSender, UnboundedReceiver<Outbound>) {
        mpsc::unbounded_channel()
    }

    #[tokio::test]
    async fn register_inserts_single_entry() {
        let registry = ConnectionRegistry::new(Channel::Events);
        let (tx, _rx) = mailbox();

        let client = registry.register(user("u1"), Role::User, tx).await;

        let entries = registry.lookup(&user("u1")).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].connection_id, client.connection_id);
    }

    #[tokio::test]
    async fn register_evicts_and_closes_prior_connection() {
        let registry = ConnectionRegistry::new(Channel::Events);
        let (tx1, mut rx1) = mailbox();
        let (tx2, _rx2) = mailbox();

        let c1 = registry.register(user("u1"), Role::User, tx1).await;
        let c2 = registry.register(user("u1"), Role::User, tx2).await;

        // The first connection got a replaced close instruction.
        match rx1.recv().await {
            Some(Outbound::Close(CloseReason::Replaced)) => {}
            other => panic!("expected replaced close, got {:?}", other),
        }

        // Only the second connection remains.
        let entries = registry.lookup(&user("u1")).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].connection_id, c2.connection_id);
        assert_ne!(c1.connection_id, c2.connection_id);
    }

    #[tokio::test]
    async fn eviction_survives_closed_mailbox() {
        let registry = ConnectionRegistry::new(Channel::Events);
        let (tx1, rx1) = mailbox();
        drop(rx1); // first connection's socket task is already gone
        let (tx2, _rx2) = mailbox();

        registry.register(user("u1"), Role::User, tx1).await;
        registry.register(user("u1"), Role::User, tx2).await;

        assert_eq!(registry.lookup(&user("u1")).await.len(), 1);
    }

    #[tokio::test]
    async fn remove_last_connection_deletes_map_entry() {
        let registry = ConnectionRegistry::new(Channel::Events);
        let (tx, _rx) = mailbox();

        let client = registry.register(user("u1"), Role::User, tx).await;
        registry.remove(&user("u1"), &client.connection_id).await;

        assert!(registry.lookup(&user("u1")).await.is_empty());
        // Entry is gone entirely, not present-but-empty.
        assert!(registry.all_entries().await.is_empty());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = ConnectionRegistry::new(Channel::Events);
        let (tx, _rx) = mailbox();

        let client = registry.register(user("u1"), Role::User, tx).await;
        registry.remove(&user("u1"), &client.connection_id).await;
        registry.remove(&user("u1"), &client.connection_id).await;

        assert!(registry.all_entries().await.is_empty());
    }

    #[tokio::test]
    async fn stale_remove_does_not_touch_replacement() {
        let registry = ConnectionRegistry::new(Channel::Events);
        let (tx1, _rx1) = mailbox();
        let (tx2, _rx2) = mailbox();

        let c1 = registry.register(user("u1"), Role::User, tx1).await;
        let c2 = registry.register(user("u1"), Role::User, tx2).await;

        // The evicted connection's cleanup fires after the replacement
        // registered; it must not remove the new connection.
        registry.remove(&user("u1"), &c1.connection_id).await;

        let entries = registry.lookup(&user("u1")).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].connection_id, c2.connection_id);
    }

    #[tokio::test]
    async fn lookup_unknown_user_returns_empty() {
        let registry = ConnectionRegistry::new(Channel::Notifications);
        assert!(registry.lookup(&user("nobody")).await.is_empty());
    }

    #[tokio::test]
    async fn connection_count_tracks_distinct_users() {
        let registry = ConnectionRegistry::new(Channel::Events);
        let (tx1, _rx1) = mailbox();
        let (tx2, _rx2) = mailbox();

        registry.register(user("u1"), Role::User, tx1).await;
        registry.register(user("u2"), Role::Admin, tx2).await;

        assert_eq!(registry.connection_count().await, 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Register(u8),
            Remove(u8),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..5).prop_map(Op::Register),
                (0u8..5).prop_map(Op::Remove),
            ]
        }

        proptest! {
            /// After any interleaving of registers and removes, no user ever
            /// holds more than one live connection, and no user key maps to
            /// an empty collection.
            #[test]
            fn at_most_one_connection_per_user(ops in proptest::collection::vec(op_strategy(), 1..40)) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(async move {
                    let registry = ConnectionRegistry::new(Channel::Events);
                    let mut live: HashMap<u8, ConnectionId> = HashMap::new();
                    // Receivers are kept so eviction sends succeed.
                    let mut mailboxes = Vec::new();

                    for op in ops {
                        match op {
                            Op::Register(u) => {
                                let (tx, rx) = mpsc::unbounded_channel();
                                mailboxes.push(rx);
                                let client = registry
                                    .register(user(&format!("u{}", u)), Role::User, tx)
                                    .await;
                                live.insert(u, client.connection_id);
                            }
                            Op::Remove(u) => {
                                if let Some(id) = live.remove(&u) {
                                    registry.remove(&user(&format!("u{}", u)), &id).await;
                                }
                            }
                        }
                    }

                    for (user_id, clients) in registry.all_entries().await {
                        assert!(!clients.is_empty(), "empty entry for {}", user_id);
                        assert_eq!(clients.len(), 1, "multiple entries for {}", user_id);
                    }
                });
            }
        }
    }
}
