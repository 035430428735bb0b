//! Registry of open relay connections.
//!
//! Each accepted WebSocket is registered under its [`ConnectionId`] for as
//! long as the transport is open. There is no fan-out between connections;
//! the registry exists for lifecycle bookkeeping and health reporting.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::chat::ConnectionStatus;
use crate::domain::foundation::{ConnectionId, StateMachine, Timestamp};

/// Bookkeeping for one open connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub status: ConnectionStatus,
    pub opened_at: Timestamp,
}

/// Tracks open connections.
///
/// Uses `RwLock` since health checks (reads) can run concurrently with
/// each other; only accept and close take the write lock.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionRecord>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly accepted connection in the `Connected` state.
    pub async fn register(&self, connection_id: ConnectionId) {
        self.connections.write().await.insert(
            connection_id,
            ConnectionRecord {
                status: ConnectionStatus::Connected,
                opened_at: Timestamp::now(),
            },
        );
    }

    /// Remove a connection whose transport closed.
    ///
    /// Returns the final record, moved to `Disconnected`, or `None` if the
    /// connection was not registered.
    pub async fn deregister(&self, connection_id: &ConnectionId) -> Option<ConnectionRecord> {
        let record = self.connections.write().await.remove(connection_id)?;
        let status = record
            .status
            .transition_to(ConnectionStatus::Disconnected)
            .unwrap_or(ConnectionStatus::Disconnected);
        Some(ConnectionRecord { status, ..record })
    }

    /// Number of open connections.
    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_tracks_connection() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::new();

        registry.register(id).await;

        assert_eq!(registry.count().await, 1);
        let record = registry.deregister(&id).await.unwrap();
        assert!(record.opened_at <= Timestamp::now());
    }

    #[tokio::test]
    async fn deregister_returns_disconnected_record() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        registry.register(id).await;

        let record = registry.deregister(&id).await.unwrap();

        assert_eq!(record.status, ConnectionStatus::Disconnected);
        assert_eq!(registry.count().await, 0);
        assert!(registry.deregister(&id).await.is_none());
    }

    #[tokio::test]
    async fn deregister_unknown_is_none() {
        let registry = ConnectionRegistry::new();
        assert!(registry.deregister(&ConnectionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn connections_are_independent() {
        let registry = ConnectionRegistry::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        registry.register(a).await;
        registry.register(b).await;

        registry.deregister(&a).await;

        assert_eq!(registry.count().await, 1);
        assert!(registry.deregister(&a).await.is_none());
        assert!(registry.deregister(&b).await.is_some());
    }
}
