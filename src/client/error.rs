//! Client session errors.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("not connected")]
    NotConnected,

    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn connect(url: impl Into<String>, source: tungstenite::Error) -> Self {
        ClientError::Connect {
            url: url.into(),
            source,
        }
    }
}
