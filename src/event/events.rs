use serde::{Deserialize, Serialize};

/// Payload of an `ALERT` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub message: String,
    #[serde(rename = "chatId", default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// Real-time notifications pushed to connected clients
///
/// Serialized as `{"event": "ALERT", "payload": {...}}` so clients can switch
/// on the event name the same way they did on the socket event names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatEvent {
    /// Show a message to the user
    Alert(AlertPayload),

    /// Reload the chat list
    RefetchChats,
}

impl ChatEvent {
    pub fn alert(message: impl Into<String>) -> Self {
        ChatEvent::Alert(AlertPayload {
            message: message.into(),
            chat_id: None,
        })
    }

    pub fn chat_alert(chat_id: impl Into<String>, message: impl Into<String>) -> Self {
        ChatEvent::Alert(AlertPayload {
            message: message.into(),
            chat_id: Some(chat_id.into()),
        })
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::Alert(_) => "ALERT",
            ChatEvent::RefetchChats => "REFETCH_CHATS",
        }
    }
}
