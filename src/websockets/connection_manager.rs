use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Tracks the outbound channel of every open socket, keyed by user id
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(
        &self,
        user_id: String,
        connection_id: String,
        sender: mpsc::UnboundedSender<String>,
    );

    async fn remove_connection(&self, user_id: &str, connection_id: &str);

    /// Sends to every open connection of the given users, returns how many sockets got it
    async fn send_to_users(&self, user_ids: &[String], message: &str) -> usize;
}

pub struct InMemoryConnectionManager {
    // user_id -> connection_id -> sender
    connections: Arc<RwLock<HashMap<String, HashMap<String, mpsc::UnboundedSender<String>>>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn connection_count(&self, user_id: &str) -> usize {
        self.connections
            .read()
            .await
            .get(user_id)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(
        &self,
        user_id: String,
        connection_id: String,
        sender: mpsc::UnboundedSender<String>,
    ) {
        let mut connections = self.connections.write().await;
        connections
            .entry(user_id)
            .or_default()
            .insert(connection_id, sender);
    }

    async fn remove_connection(&self, user_id: &str, connection_id: &str) {
        let mut connections = self.connections.write().await;
        if let Some(user_connections) = connections.get_mut(user_id) {
            user_connections.remove(connection_id);
            if user_connections.is_empty() {
                connections.remove(user_id);
            }
        }
    }

    async fn send_to_users(&self, user_ids: &[String], message: &str) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;
        for user_id in user_ids {
            if let Some(user_connections) = connections.get(user_id) {
                for sender in user_connections.values() {
                    if sender.send(message.to_string()).is_ok() {
                        delivered += 1;
                    }
                }
            }
        }
        delivered
    }
}
