pub mod events;
pub mod messages;

// Re-export the essential types
pub use events::{InteractionContext, InteractionMode, PointerEvent};
pub use messages::{ControlState, Outbox, ProtocolMessage, TokenMoved};
