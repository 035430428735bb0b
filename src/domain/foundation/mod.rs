//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps and the state machine contract used by the
//! chat domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::ConnectionId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
