use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;

use groupchat::{
    auth::TokenConfig,
    chat::repository::InMemoryChatRepository,
    create_router,
    event::ConnectionEventEmitter,
    user::{models::UserModel, repository::InMemoryUserRepository},
    websockets::{ConnectionManager, InMemoryConnectionManager},
    AppState,
};

use super::events::EventInbox;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub router: Router,
    pub chats: Arc<InMemoryChatRepository>,
    tokens: HashMap<String, String>,
    inboxes: HashMap<String, EventInbox>,
}

pub struct TestSetupBuilder {
    users: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { users: vec![] }
    }

    pub fn with_users(mut self, users: Vec<&str>) -> Self {
        self.users = users.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_five_users(self) -> Self {
        self.with_users(vec!["alice", "bob", "charlie", "david", "erin"])
    }

    pub async fn build(self) -> TestSetup {
        let token_config = TokenConfig::default();
        let chats = Arc::new(InMemoryChatRepository::new());
        let users = Arc::new(InMemoryUserRepository::with_users(
            self.users
                .iter()
                .map(|id| {
                    UserModel::new(
                        id.clone(),
                        capitalize(id),
                        format!("https://avatars.test/{}.png", id),
                    )
                })
                .collect(),
        ));
        let connection_manager = Arc::new(InMemoryConnectionManager::new());
        let emitter = Arc::new(ConnectionEventEmitter::new(connection_manager.clone()));

        // Every user gets one "socket" so emitted events can be inspected
        let mut tokens = HashMap::new();
        let mut inboxes = HashMap::new();
        for user in &self.users {
            let (sender, receiver) = mpsc::unbounded_channel();
            connection_manager
                .add_connection(user.clone(), format!("{}-socket", user), sender)
                .await;
            inboxes.insert(user.clone(), EventInbox::new(receiver));
            tokens.insert(user.clone(), token_config.create_token(user).unwrap());
        }

        let state = AppState::new(
            chats.clone(),
            users,
            emitter,
            connection_manager,
            token_config,
        );

        TestSetup {
            router: create_router(state),
            chats,
            tokens,
            inboxes,
        }
    }
}

impl TestSetup {
    pub async fn send(
        &self,
        user: &str,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", self.tokens[user]));

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub fn inbox(&mut self, user: &str) -> &mut EventInbox {
        self.inboxes.get_mut(user).unwrap()
    }

    /// Discards everything delivered so far
    pub fn clear_events(&mut self) {
        for inbox in self.inboxes.values_mut() {
            inbox.drain();
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
