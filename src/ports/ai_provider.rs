//! AI Provider Port - Interface for generative AI integrations.
//!
//! The relay hands each prompt to an [`AIProvider`] on its own: no history,
//! no streaming, no retries. Whatever goes wrong surfaces as an [`AIError`]
//! whose display text is shown to the user.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn generate(&self, prompt: &str) -> Result<String, AIError> {
//!         Ok(prompt.to_string())
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for generative AI interactions.
///
/// Implementations connect to external AI services (Gemini, OpenAI, ...)
/// and translate between the provider-specific API and plain text.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a reply for a single prompt.
    ///
    /// Performs exactly one call to the external service.
    async fn generate(&self, prompt: &str) -> Result<String, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Provider identification, reported in logs and health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini", "openai").
    pub name: String,
    /// Model identifier (e.g., "gemini-2.0-flash").
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
///
/// Every variant means the same thing to the user: the AI request failed.
/// The variants only shape the message shown.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// The service reported an error message of its own.
    #[error("{message}")]
    Provider {
        /// Message from the service, shown as-is.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Non-success status without a usable error body.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response parsed but carried no text.
    #[error("empty response from AI service")]
    EmptyResponse,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

impl AIError {
    /// Creates a provider-reported error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Maps a non-success HTTP response onto an error.
    ///
    /// Bodies shaped like `{"error": {"message": "..."}}` (used by both
    /// Gemini and OpenAI) surface their message directly.
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 401 || status == 403 {
            return AIError::AuthenticationFailed;
        }

        let upstream = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.trim().is_empty());

        match upstream {
            Some(message) => AIError::provider(message),
            None => AIError::UnexpectedStatus { status, body },
        }
    }
}
