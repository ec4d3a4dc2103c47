use crate::{
    context::Context,
    error::MinitatsError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// AI Provider trait — free-form chat replies.
///
/// Every AI backend implements this trait to provide a uniform interface.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider requires an API key to function.
    fn requires_api_key(&self) -> bool;

    /// Send a conversation context to the provider and get a response.
    async fn complete(&self, context: &Context) -> Result<OutgoingMessage, MinitatsError>;

    /// Check if the provider is available and ready.
    async fn is_available(&self) -> bool;
}

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive and send messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, MinitatsError>;

    /// Send a response back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), MinitatsError>;

    /// Send a typing indicator to show the bot is processing.
    async fn send_typing(&self, _target: &str) -> Result<(), MinitatsError> {
        Ok(())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), MinitatsError>;
}

/// One date expression found inside a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// The matched substring, exactly as it appears in the input.
    pub text: String,
    /// Byte offset of the match start in the input.
    pub start: usize,
    /// Byte offset one past the match end in the input.
    pub end: usize,
    /// The absolute instant the expression resolves to.
    pub at: DateTime<Utc>,
}

/// Natural-language date resolution.
///
/// Implementations must prefer future occurrences: an expression such as
/// "friday" without a time resolves to the next upcoming Friday relative to
/// `reference`, never a past one. Matches are returned in order of
/// appearance; an empty vector means nothing was understood.
pub trait DateResolver: Send + Sync {
    fn resolve(&self, text: &str, reference: DateTime<Utc>) -> Vec<DateMatch>;
}
