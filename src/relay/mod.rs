//! Transport-agnostic relay core.
//!
//! Inbound events are described here without any chat-platform types; the
//! Telegram adapter in [`crate::bot`] converts teloxide messages into
//! [`InboundEvent`]s and implements [`DispatchGateway`] for the way back.

/// Outbound dispatch abstraction.
pub mod gateway;
/// Media group aggregation task.
pub mod media_group;
/// Per-event routing and error policy.
pub mod service;

use crate::links::LinkReplacer;
use std::fmt;
use thiserror::Error;

pub use gateway::{DispatchError, DispatchGateway};
pub use media_group::{
    spawn_media_group_aggregator, AggregatorConfig, AggregatorStats, MediaGroup, MediaGroupHandle,
};
pub use service::Relay;

/// Attachment kinds that are echoed back with their caption rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Photo (largest size is forwarded)
    Photo,
    /// Video
    Video,
    /// Generic file
    Document,
    /// Audio track
    Audio,
    /// GIF or silent video
    Animation,
}

impl MediaKind {
    /// Lowercase name used in replies and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Document => "document",
            Self::Audio => "audio",
            Self::Animation => "animation",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Content kinds that never carry substitutable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoTextKind {
    /// Voice message
    Voice,
    /// Round video message
    VideoNote,
    /// Sticker
    Sticker,
}

impl NoTextKind {
    /// Fixed informational reply sent instead of an echo.
    #[must_use]
    pub const fn reply(self) -> &'static str {
        match self {
            Self::Voice => "🎤 Voice messages don't contain text links to replace.",
            Self::VideoNote => "📹 Video notes don't contain text links to replace.",
            Self::Sticker => "😄 Stickers don't contain text links to replace.",
        }
    }

    /// Lowercase name used in replies and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Voice => "voice message",
            Self::VideoNote => "video note",
            Self::Sticker => "sticker",
        }
    }
}

/// What an inbound event carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundContent {
    /// Plain text message
    Text(String),
    /// Attachment with an optional caption
    Media {
        /// Attachment kind
        kind: MediaKind,
        /// Opaque platform handle of the attachment
        content_ref: String,
        /// Caption as sent by the user
        caption: Option<String>,
    },
    /// Content without text
    NoText(NoTextKind),
}

impl InboundContent {
    /// Lowercase name used in apologies and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "message",
            Self::Media { kind, .. } => kind.label(),
            Self::NoText(kind) => kind.label(),
        }
    }
}

/// One inbound chat event, already stripped of platform types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Chat to answer in
    pub chat_id: i64,
    /// Sender, for logging only
    pub sender_id: i64,
    /// Payload
    pub content: InboundContent,
    /// Platform album identifier, if the attachment belongs to one
    pub group_id: Option<String>,
}

/// A buffered attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Attachment kind
    pub kind: MediaKind,
    /// Opaque platform handle of the attachment
    pub content_ref: String,
    /// Caption as sent by the user
    pub original_caption: Option<String>,
    /// Caption after link substitution, computed on arrival
    pub processed_caption: Option<String>,
}

impl MediaItem {
    /// Builds an item, running the caption through `replacer` once.
    #[must_use]
    pub fn arrive(
        kind: MediaKind,
        content_ref: impl Into<String>,
        caption: Option<String>,
        replacer: &LinkReplacer,
    ) -> Self {
        let processed_caption = replacer
            .process_optional(caption.as_deref())
            .map(std::borrow::Cow::into_owned);
        Self {
            kind,
            content_ref: content_ref.into(),
            original_caption: caption,
            processed_caption,
        }
    }

    /// Outbound form carrying the processed caption.
    #[must_use]
    pub fn into_outbound(self) -> OutboundMedia {
        OutboundMedia {
            kind: self.kind,
            content_ref: self.content_ref,
            caption: self.processed_caption,
        }
    }
}

/// An attachment as handed to the [`DispatchGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMedia {
    /// Attachment kind
    pub kind: MediaKind,
    /// Opaque platform handle of the attachment
    pub content_ref: String,
    /// Caption to send, if any
    pub caption: Option<String>,
}

/// Errors raised while relaying one event.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The gateway failed to deliver
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The media group task is gone
    #[error("Media group aggregator is not running")]
    AggregatorClosed,
}

impl RelayError {
    /// Whether the failure came from the chat platform.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Dispatch(DispatchError::Transport(_)))
    }
}
