use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::events::ChatEvent;
use crate::websockets::ConnectionManager;

/// Publishes events to a set of users
///
/// Emitting never fails the caller: notifications are best-effort and a
/// request that already persisted its changes still succeeds.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn emit(&self, event: ChatEvent, user_ids: &[String]);
}

/// Delivers events over the users' open WebSocket connections
pub struct ConnectionEventEmitter {
    connections: Arc<dyn ConnectionManager>,
}

impl ConnectionEventEmitter {
    pub fn new(connections: Arc<dyn ConnectionManager>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl EventEmitter for ConnectionEventEmitter {
    async fn emit(&self, event: ChatEvent, user_ids: &[String]) {
        let message = match serde_json::to_string(&event) {
            Ok(message) => message,
            Err(e) => {
                warn!(event = event.name(), error = %e, "Failed to serialize event");
                return;
            }
        };

        let delivered = self.connections.send_to_users(user_ids, &message).await;

        debug!(
            event = event.name(),
            recipients = user_ids.len(),
            delivered,
            "Event emitted"
        );
    }
}
