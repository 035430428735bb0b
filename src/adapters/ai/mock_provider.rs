//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests (and local runs without credentials) to work without
//! calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Per-response delays, for exercising out-of-order replies
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("Hi there!")
//!     .with_error("quota exceeded");
//!
//! assert_eq!(provider.generate("hello").await?, "Hi there!");
//! assert!(provider.generate("x").await.is_err());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, AIProvider, ProviderInfo};

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Simulated latency for responses without their own delay.
    delay: Duration,
    /// Prompts received, in call order.
    calls: Arc<Mutex<Vec<String>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return generated text.
    Success {
        text: String,
        delay: Option<Duration>,
    },
    /// Fail with a provider-reported message (may be empty).
    Error {
        message: String,
        delay: Option<Duration>,
    },
}

impl MockResponse {
    fn delay(&self) -> Option<Duration> {
        match self {
            MockResponse::Success { delay, .. } | MockResponse::Error { delay, .. } => *delay,
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockResponse::Success {
            text: text.into(),
            delay: None,
        })
    }

    /// Adds a successful response that settles after `delay`.
    pub fn with_delayed_response(self, text: impl Into<String>, delay: Duration) -> Self {
        self.push(MockResponse::Success {
            text: text.into(),
            delay: Some(delay),
        })
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(MockResponse::Error {
            message: message.into(),
            delay: None,
        })
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all prompts received, in call order.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Gets the next response, or an echo when the queue is empty.
    fn next_response(&self, prompt: &str) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                text: format!("Mock response to: {}", prompt),
                delay: None,
            })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AIError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let response = self.next_response(prompt);
        let delay = response.delay().unwrap_or(self.delay);
        if !delay.is_zero() {
            sleep(delay).await;
        }

        match response {
            MockResponse::Success { text, .. } => Ok(text),
            MockResponse::Error { message, .. } => Err(AIError::provider(message)),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model-1")
    }
}
