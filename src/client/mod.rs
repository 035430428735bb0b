//! Chat client - a connection-scoped session over the relay's WebSocket.
//!
//! [`ChatSession`] owns one connection and the [`Transcript`] of a single
//! client run. The `chat-client` binary is a thin terminal front end on top.
//!
//! [`Transcript`]: crate::domain::chat::Transcript

mod error;
mod session;

pub use error::ClientError;
pub use session::{ChatSession, SessionUpdate};

/// Trims user input; `None` when nothing is left to send.
pub fn normalize_input(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_is_dropped() {
        assert_eq!(normalize_input(""), None);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_input("  hello \n"), Some("hello"));
    }

    #[test]
    fn inner_whitespace_is_kept() {
        assert_eq!(normalize_input("hello   world"), Some("hello   world"));
    }

    proptest! {
        #[test]
        fn whitespace_only_input_is_never_sent(input in "[ \t\r\n]*") {
            prop_assert_eq!(normalize_input(&input), None);
        }

        #[test]
        fn normalized_input_has_no_outer_whitespace(input in ".*") {
            if let Some(out) = normalize_input(&input) {
                prop_assert!(!out.is_empty());
                prop_assert_eq!(out, out.trim());
            }
        }
    }
}
