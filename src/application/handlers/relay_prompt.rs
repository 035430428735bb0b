//! RelayPrompt command handler.
//!
//! Forwards one prompt to the AI provider and settles the outcome into an
//! [`AiReply`]. Provider failures never escape as errors: they become the
//! failure branch of the reply, so every prompt yields exactly one reply.

use std::sync::Arc;
use std::time::Instant;

use crate::domain::chat::AiReply;
use crate::domain::foundation::ConnectionId;
use crate::ports::AIProvider;

/// Command to relay a prompt received on a connection.
#[derive(Debug, Clone)]
pub struct RelayPromptCommand {
    /// Connection the prompt arrived on.
    pub connection_id: ConnectionId,
    /// Prompt text, forwarded unmodified.
    pub prompt: String,
}

impl RelayPromptCommand {
    /// Creates a new relay command.
    pub fn new(connection_id: ConnectionId, prompt: impl Into<String>) -> Self {
        Self {
            connection_id,
            prompt: prompt.into(),
        }
    }
}

/// Handler that performs a single AI call per prompt.
#[derive(Clone)]
pub struct RelayPromptHandler {
    provider: Arc<dyn AIProvider>,
}

impl RelayPromptHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    /// Name of the provider behind this handler.
    pub fn provider_name(&self) -> String {
        self.provider.provider_info().name
    }

    /// Relays the prompt. No retry; no timeout beyond the provider's own.
    pub async fn handle(&self, cmd: RelayPromptCommand) -> AiReply {
        let started = Instant::now();
        tracing::debug!(
            connection_id = %cmd.connection_id,
            prompt_len = cmd.prompt.len(),
            "Relaying prompt"
        );

        let result = self.provider.generate(&cmd.prompt).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if let Err(e) = &result {
            tracing::warn!(
                connection_id = %cmd.connection_id,
                elapsed_ms,
                error = %e,
                "AI request failed"
            );
        } else {
            tracing::debug!(
                connection_id = %cmd.connection_id,
                elapsed_ms,
                "AI reply received"
            );
        }

        AiReply::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::chat::FALLBACK_ERROR_MESSAGE;

    fn handler(provider: MockAIProvider) -> RelayPromptHandler {
        RelayPromptHandler::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn success_becomes_success_reply() {
        let reply = handler(MockAIProvider::new().with_response("Hi there!"))
            .handle(RelayPromptCommand::new(ConnectionId::new(), "hello"))
            .await;
        assert_eq!(reply, AiReply::success("Hi there!"));
    }

    #[tokio::test]
    async fn provider_message_is_surfaced() {
        let reply = handler(MockAIProvider::new().with_error("quota exceeded"))
            .handle(RelayPromptCommand::new(ConnectionId::new(), "x"))
            .await;
        assert_eq!(reply, AiReply::failure("quota exceeded"));
    }

    #[tokio::test]
    async fn messageless_failure_uses_fallback() {
        let reply = handler(MockAIProvider::new().with_error(""))
            .handle(RelayPromptCommand::new(ConnectionId::new(), "x"))
            .await;
        assert_eq!(
            reply,
            AiReply::Failure {
                message: FALLBACK_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn prompt_is_forwarded_unmodified() {
        let provider = MockAIProvider::new();
        let relay = handler(provider.clone());

        relay
            .handle(RelayPromptCommand::new(ConnectionId::new(), "  padded  "))
            .await;
        relay.handle(RelayPromptCommand::new(ConnectionId::new(), "")).await;

        assert_eq!(provider.get_calls(), vec!["  padded  ".to_string(), String::new()]);
    }

    #[tokio::test]
    async fn reports_provider_name() {
        assert_eq!(handler(MockAIProvider::new()).provider_name(), "mock");
    }
}
