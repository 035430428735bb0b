//! Command handlers.
//!
//! - `relay_prompt` - forward one prompt to the AI provider and settle the reply

mod relay_prompt;

pub use relay_prompt::{RelayPromptCommand, RelayPromptHandler};
