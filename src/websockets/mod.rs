// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::websocket_handler;
pub use socket::{Connection, Inbound, SocketError, SocketWrapper};

// Internal modules
mod connection_manager;
mod handler;
mod socket;
