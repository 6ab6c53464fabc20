use groupchat::ChatEvent;
use tokio::sync::mpsc;

// ============================================================================
// Captured socket traffic for one user
// ============================================================================

pub struct EventInbox {
    receiver: mpsc::UnboundedReceiver<String>,
}

impl EventInbox {
    pub fn new(receiver: mpsc::UnboundedReceiver<String>) -> Self {
        Self { receiver }
    }

    /// Everything delivered since the last drain, decoded
    pub fn drain(&mut self) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        while let Ok(raw) = self.receiver.try_recv() {
            events.push(serde_json::from_str(&raw).expect("socket message is a ChatEvent"));
        }
        events
    }

    pub fn assert_empty(&mut self) {
        let events = self.drain();
        assert!(events.is_empty(), "expected no events, got {:?}", events);
    }
}
