//! ConnectionStatus - lifecycle of one transport connection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Transport status of a connection.
///
/// A connection starts `Connected` when accepted and ends `Disconnected`
/// when the transport closes. There is no way back; a reconnect is a new
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl StateMachine for ConnectionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionStatus::*;
        matches!((self, target), (Connected, Disconnected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionStatus::*;
        match self {
            Connected => vec![Disconnected],
            Disconnected => vec![],
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_connected() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Connected);
    }

    #[test]
    fn connected_can_transition_to_disconnected() {
        assert_eq!(
            ConnectionStatus::Connected.transition_to(ConnectionStatus::Disconnected),
            Ok(ConnectionStatus::Disconnected)
        );
    }

    #[test]
    fn disconnected_is_terminal() {
        assert!(ConnectionStatus::Disconnected.is_terminal());
        assert!(ConnectionStatus::Disconnected
            .transition_to(ConnectionStatus::Connected)
            .is_err());
    }

    #[test]
    fn connected_cannot_transition_to_connected() {
        assert!(!ConnectionStatus::Connected.can_transition_to(&ConnectionStatus::Connected));
    }

    #[test]
    fn display_works_correctly() {
        assert_eq!(ConnectionStatus::Connected.to_string(), "Connected");
        assert_eq!(ConnectionStatus::Disconnected.to_string(), "Disconnected");
    }
}
