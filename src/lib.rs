// Library crate for the group chat server
// This file exposes the public API for integration tests

pub mod auth;
pub mod chat;
pub mod config;
pub mod event;
pub mod routes;
pub mod shared;
pub mod user;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use chat::{models::ChatModel, repository::ChatRepository, ChatService};
pub use config::AppConfig;
pub use event::{ChatEvent, EventEmitter};
pub use routes::create_router;
pub use shared::{AppError, AppState};
