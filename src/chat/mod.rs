// Public API - what other modules can use
pub use handlers::{
    add_members, get_my_chats, get_my_groups, leave_group, new_group_chat, remove_member,
};
pub use service::ChatService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
