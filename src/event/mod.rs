// Real-time notifications sent to users after a chat changes

// Public API - what other modules can use
pub use emitter::{ConnectionEventEmitter, EventEmitter};
pub use events::{AlertPayload, ChatEvent};

// Internal modules
mod emitter;
mod events;
