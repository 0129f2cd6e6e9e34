use super::{
    DispatchGateway, InboundContent, InboundEvent, MediaGroupHandle, MediaItem, MediaKind,
    RelayError,
};
use crate::links::LinkReplacer;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Routes inbound events through the replacer, the aggregator, or straight
/// back to the gateway.
#[derive(Clone)]
pub struct Relay {
    replacer: Arc<LinkReplacer>,
    gateway: Arc<dyn DispatchGateway>,
    groups: MediaGroupHandle,
}

impl Relay {
    /// Creates a relay over shared collaborators.
    #[must_use]
    pub fn new(
        replacer: Arc<LinkReplacer>,
        gateway: Arc<dyn DispatchGateway>,
        groups: MediaGroupHandle,
    ) -> Self {
        Self {
            replacer,
            gateway,
            groups,
        }
    }

    /// The link replacer in use.
    #[must_use]
    pub fn replacer(&self) -> &LinkReplacer {
        &self.replacer
    }

    /// Handle to the media group aggregator.
    #[must_use]
    pub const fn groups(&self) -> &MediaGroupHandle {
        &self.groups
    }

    /// Handles one event end to end. Failures are logged and answered with an
    /// apology; nothing propagates to the caller.
    pub async fn handle(&self, event: InboundEvent) {
        let chat_id = event.chat_id;
        let sender_id = event.sender_id;
        let label = event.content.label();
        let is_text = matches!(event.content, InboundContent::Text(_));

        let Err(e) = self.relay(event).await else {
            return;
        };

        error!(chat_id, sender_id, kind = label, error = %e, "Failed to relay {label}");
        let apology = apology(&e, label, is_text);
        if let Err(send_err) = self.gateway.reply_text(chat_id, &apology).await {
            warn!(chat_id, error = %send_err, "Failed to send apology");
        }
    }

    /// Relays one event.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Dispatch` if the gateway fails, or
    /// `RelayError::AggregatorClosed` if an album item cannot be buffered.
    pub async fn relay(&self, event: InboundEvent) -> Result<(), RelayError> {
        let InboundEvent {
            chat_id,
            sender_id,
            content,
            group_id,
        } = event;

        match content {
            InboundContent::Text(text) => {
                let result = self.replacer.substitute(&text);
                info!(
                    chat_id,
                    sender_id,
                    replacements = result.replacements,
                    "Relaying text message"
                );
                self.gateway.reply_text(chat_id, &result.text).await?;
            }
            InboundContent::Media {
                kind,
                content_ref,
                caption,
            } => {
                let item = MediaItem::arrive(kind, content_ref, caption, &self.replacer);
                match group_id {
                    Some(group_id) => {
                        debug!(chat_id, group_id = %group_id, %kind, "Buffering album item");
                        self.groups.append(chat_id, group_id, item).await?;
                    }
                    None => self.relay_single(chat_id, sender_id, kind, item).await?,
                }
            }
            InboundContent::NoText(kind) => {
                info!(chat_id, sender_id, kind = kind.label(), "Content without text");
                self.gateway.reply_text(chat_id, kind.reply()).await?;
            }
        }
        Ok(())
    }

    async fn relay_single(
        &self,
        chat_id: i64,
        sender_id: i64,
        kind: MediaKind,
        item: MediaItem,
    ) -> Result<(), RelayError> {
        let changed = item.processed_caption != item.original_caption;
        info!(chat_id, sender_id, %kind, caption_changed = changed, "Relaying {kind}");
        self.gateway.send_single(chat_id, item.into_outbound()).await?;
        Ok(())
    }
}

fn apology(error: &RelayError, label: &str, is_text: bool) -> String {
    if error.is_transport() {
        format!("❌ Sorry, there was an error processing your {label}. Please try again.")
    } else if is_text {
        "❌ An unexpected error occurred. Please try again.".to_string()
    } else {
        format!("❌ An unexpected error occurred while processing your {label}.")
    }
}
