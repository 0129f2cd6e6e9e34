use super::OutboundMedia;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`DispatchGateway`].
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The chat platform rejected or failed the request
    #[error("Transport error: {0}")]
    Transport(String),
    /// The batch cannot be sent as given (empty, too large, ...)
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),
}

/// Outbound side of the relay.
///
/// Failures are reported to the caller as-is; implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchGateway: Send + Sync + 'static {
    /// Sends one attachment with its optional caption.
    async fn send_single(&self, chat_id: i64, item: OutboundMedia) -> Result<(), DispatchError>;

    /// Sends attachments as one album. Only `items[0]` may carry a caption.
    async fn send_group(&self, chat_id: i64, items: Vec<OutboundMedia>)
        -> Result<(), DispatchError>;

    /// Sends a plain text message.
    async fn reply_text(&self, chat_id: i64, text: &str) -> Result<(), DispatchError>;
}
