//! Telegram implementation of the dispatch gateway.

use crate::relay::media_group::MAX_MEDIA_GROUP_ITEMS;
use crate::relay::{DispatchError, DispatchGateway, MediaKind, OutboundMedia};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, FileId, InputFile, InputMedia, InputMediaAudio, InputMediaDocument, InputMediaPhoto,
    InputMediaVideo,
};
use tracing::debug;

/// Sends relay output through the Bot API.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    /// Wraps a bot client.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn transport(e: teloxide::RequestError) -> DispatchError {
    DispatchError::Transport(e.to_string())
}

fn input_file(content_ref: String) -> InputFile {
    InputFile::file_id(FileId(content_ref))
}

fn album_entry(item: OutboundMedia) -> Result<InputMedia, DispatchError> {
    let file = input_file(item.content_ref);
    let media = match item.kind {
        MediaKind::Photo => {
            let mut media = InputMediaPhoto::new(file);
            if let Some(caption) = item.caption {
                media = media.caption(caption);
            }
            InputMedia::Photo(media)
        }
        MediaKind::Video => {
            let mut media = InputMediaVideo::new(file);
            if let Some(caption) = item.caption {
                media = media.caption(caption);
            }
            InputMedia::Video(media)
        }
        MediaKind::Document => {
            let mut media = InputMediaDocument::new(file);
            if let Some(caption) = item.caption {
                media = media.caption(caption);
            }
            InputMedia::Document(media)
        }
        MediaKind::Audio => {
            let mut media = InputMediaAudio::new(file);
            if let Some(caption) = item.caption {
                media = media.caption(caption);
            }
            InputMedia::Audio(media)
        }
        MediaKind::Animation => {
            return Err(DispatchError::InvalidBatch(
                "animations cannot be sent as part of an album".into(),
            ));
        }
    };
    Ok(media)
}

#[async_trait]
impl DispatchGateway for TelegramGateway {
    async fn send_single(&self, chat_id: i64, item: OutboundMedia) -> Result<(), DispatchError> {
        let chat = ChatId(chat_id);
        let file = input_file(item.content_ref);
        let caption = item.caption;

        match item.kind {
            MediaKind::Photo => {
                let mut req = self.bot.send_photo(chat, file);
                if let Some(caption) = caption {
                    req = req.caption(caption);
                }
                req.await.map_err(transport)?;
            }
            MediaKind::Video => {
                let mut req = self.bot.send_video(chat, file);
                if let Some(caption) = caption {
                    req = req.caption(caption);
                }
                req.await.map_err(transport)?;
            }
            MediaKind::Document => {
                let mut req = self.bot.send_document(chat, file);
                if let Some(caption) = caption {
                    req = req.caption(caption);
                }
                req.await.map_err(transport)?;
            }
            MediaKind::Audio => {
                let mut req = self.bot.send_audio(chat, file);
                if let Some(caption) = caption {
                    req = req.caption(caption);
                }
                req.await.map_err(transport)?;
            }
            MediaKind::Animation => {
                let mut req = self.bot.send_animation(chat, file);
                if let Some(caption) = caption {
                    req = req.caption(caption);
                }
                req.await.map_err(transport)?;
            }
        }
        Ok(())
    }

    async fn send_group(
        &self,
        chat_id: i64,
        mut items: Vec<OutboundMedia>,
    ) -> Result<(), DispatchError> {
        match items.len() {
            0 => Err(DispatchError::InvalidBatch("empty media group".into())),
            // Albums need at least two entries.
            1 => {
                let item = items.remove(0);
                debug!(chat_id, "Single-item media group sent as a plain attachment");
                self.send_single(chat_id, item).await
            }
            n if n > MAX_MEDIA_GROUP_ITEMS => Err(DispatchError::InvalidBatch(format!(
                "media group has {n} items, at most {MAX_MEDIA_GROUP_ITEMS} allowed"
            ))),
            _ => {
                let media = items
                    .into_iter()
                    .map(album_entry)
                    .collect::<Result<Vec<_>, _>>()?;
                self.bot
                    .send_media_group(ChatId(chat_id), media)
                    .await
                    .map_err(transport)?;
                Ok(())
            }
        }
    }

    async fn reply_text(&self, chat_id: i64, text: &str) -> Result<(), DispatchError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(transport)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbound(kind: MediaKind, caption: Option<&str>) -> OutboundMedia {
        OutboundMedia {
            kind,
            content_ref: "AgADBAAD".to_string(),
            caption: caption.map(str::to_string),
        }
    }

    #[test]
    fn album_entry_keeps_caption_and_kind() {
        match album_entry(outbound(MediaKind::Photo, Some("cap"))) {
            Ok(InputMedia::Photo(photo)) => assert_eq!(photo.caption.as_deref(), Some("cap")),
            other => panic!("unexpected album entry: {other:?}"),
        }
        assert!(matches!(
            album_entry(outbound(MediaKind::Document, None)),
            Ok(InputMedia::Document(_))
        ));
    }

    #[test]
    fn animations_are_rejected_in_albums() {
        assert!(matches!(
            album_entry(outbound(MediaKind::Animation, None)),
            Err(DispatchError::InvalidBatch(_))
        ));
    }

    #[tokio::test]
    async fn oversized_and_empty_groups_are_rejected_before_sending() {
        let gateway = TelegramGateway::new(Bot::new("123456:TEST"));
        let empty = gateway.send_group(1, Vec::new()).await;
        assert!(matches!(empty, Err(DispatchError::InvalidBatch(_))));

        let many = vec![outbound(MediaKind::Photo, None); MAX_MEDIA_GROUP_ITEMS + 1];
        let oversized = gateway.send_group(1, many).await;
        assert!(matches!(oversized, Err(DispatchError::InvalidBatch(_))));
    }
}
