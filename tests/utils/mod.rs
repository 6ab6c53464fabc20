pub mod events;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use events::EventInbox;
pub use setup::{TestSetup, TestSetupBuilder};
