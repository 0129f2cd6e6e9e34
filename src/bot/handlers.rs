use crate::relay::{InboundContent, InboundEvent, MediaKind, NoTextKind, Relay};
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};
use tracing::info;

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Start the bot and show welcome message
    #[command(description = "Start the bot and see the welcome message.")]
    Start,
    /// Show usage help
    #[command(description = "Show help.")]
    Help,
    /// Show bot status
    #[command(description = "Check bot status.")]
    Status,
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
#[must_use]
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Welcome text for `/start`.
#[must_use]
pub fn start_text(canonical: &str) -> String {
    format!(
        "👋 <b>Welcome!</b> I can help you replace links in your messages.\n\n\
        <b>How it works:</b>\n\
        • Send me any message with links\n\
        • I'll replace all links with your specified link\n\
        • Media and text content will be preserved\n\n\
        <b>Supported content:</b>\n\
        • Text messages\n\
        • Photos with captions\n\
        • Videos with captions\n\
        • Documents with captions\n\
        • Audio files with captions\n\
        • Albums, with the caption of the first item\n\n\
        <b>Current replacement link:</b>\n<code>{}</code>\n\n\
        Just send me a message and I'll process it for you! 🚀",
        html_escape::encode_text(canonical)
    )
}

/// Usage text for `/help`.
#[must_use]
pub fn help_text() -> String {
    "🔗 <b>Link Swap Bot - Help</b>\n\n\
    <b>Commands:</b>\n\
    • /start - Start the bot and see the welcome message\n\
    • /help - Show this help message\n\
    • /status - Check bot status\n\n\
    <b>Usage:</b>\n\
    1. Send me any message containing links\n\
    2. I'll automatically detect and replace all links\n\
    3. You'll receive the modified message back\n\n\
    <b>Supported link formats:</b>\n\
    • http://example.com\n\
    • https://example.com\n\
    • www.example.com\n\
    • example.com\n\
    • user@example.com\n\
    • Shortened URLs (bit.ly, tinyurl, etc.)\n\
    • Social media links (t.me, discord.gg, etc.)\n\n\
    <b>Note:</b> All media and text content will be preserved exactly as you sent it!"
        .to_string()
}

/// Status text for `/status`. `pending_groups` is `None` when the album
/// aggregator is not reachable.
#[must_use]
pub fn status_text(canonical: &str, pending_groups: Option<usize>) -> String {
    let albums = pending_groups.map_or_else(
        || "• Album collection ⚠️ unavailable\n".to_string(),
        |n| format!("• Album collection ✅ ({n} in progress)\n"),
    );
    format!(
        "✅ <b>Bot Status: Active</b>\n\n\
        <b>Current replacement link:</b>\n<code>{}</code>\n\n\
        <b>Bot capabilities:</b>\n\
        • Link detection and replacement ✅\n\
        • Media preservation ✅\n\
        • Text content preservation ✅\n\
        • Multiple link format support ✅\n\
        {albums}\n\
        Ready to process your messages! 🚀",
        html_escape::encode_text(canonical)
    )
}

/// Start handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message, relay: Arc<Relay>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    bot.send_message(msg.chat.id, start_text(relay.replacer().canonical()))
        .parse_mode(ParseMode::Html)
        .await?;
    info!("User {user_id} started the bot");
    Ok(())
}

/// Help handler
///
/// # Errors
///
/// Returns an error if the help message cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    bot.send_message(msg.chat.id, help_text())
        .parse_mode(ParseMode::Html)
        .await?;
    info!("User {user_id} requested help");
    Ok(())
}

/// Status handler
///
/// # Errors
///
/// Returns an error if the status message cannot be sent.
pub async fn status(bot: Bot, msg: Message, relay: Arc<Relay>) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let pending = relay.groups().pending_groups().await.ok();
    bot.send_message(
        msg.chat.id,
        status_text(relay.replacer().canonical(), pending),
    )
    .parse_mode(ParseMode::Html)
    .await?;
    info!("User {user_id} checked bot status");
    Ok(())
}

/// Converts a Telegram message into a relay event.
///
/// Returns `None` for content the relay does not handle (service messages,
/// polls, locations, ...). Photos use the largest available size.
#[must_use]
pub fn inbound_event(msg: &Message) -> Option<InboundEvent> {
    let content = if let Some(text) = msg.text() {
        InboundContent::Text(text.to_string())
    } else if let Some(kind) = no_text_kind(msg) {
        InboundContent::NoText(kind)
    } else {
        let (kind, content_ref) = media_ref(msg)?;
        InboundContent::Media {
            kind,
            content_ref,
            caption: msg.caption().map(str::to_string),
        }
    };

    Some(InboundEvent {
        chat_id: msg.chat.id.0,
        sender_id: get_user_id_safe(msg),
        content,
        group_id: msg.media_group_id().map(ToString::to_string),
    })
}

fn no_text_kind(msg: &Message) -> Option<NoTextKind> {
    if msg.voice().is_some() {
        Some(NoTextKind::Voice)
    } else if msg.video_note().is_some() {
        Some(NoTextKind::VideoNote)
    } else if msg.sticker().is_some() {
        Some(NoTextKind::Sticker)
    } else {
        None
    }
}

fn media_ref(msg: &Message) -> Option<(MediaKind, String)> {
    if let Some(photo) = msg.photo().and_then(<[_]>::last) {
        return Some((MediaKind::Photo, photo.file.id.to_string()));
    }
    if let Some(animation) = msg.animation() {
        return Some((MediaKind::Animation, animation.file.id.to_string()));
    }
    if let Some(video) = msg.video() {
        return Some((MediaKind::Video, video.file.id.to_string()));
    }
    if let Some(audio) = msg.audio() {
        return Some((MediaKind::Audio, audio.file.id.to_string()));
    }
    msg.document()
        .map(|document| (MediaKind::Document, document.file.id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parsing() {
        assert_eq!(Command::parse("/start", "link_swap_bot").ok(), Some(Command::Start));
        assert_eq!(Command::parse("/status", "link_swap_bot").ok(), Some(Command::Status));
        assert!(Command::parse("/unknown", "link_swap_bot").is_err());
    }

    #[test]
    fn replies_escape_the_canonical_link() {
        let text = start_text("https://safe.example/go?a=1&b=<2>");
        assert!(text.contains("<code>https://safe.example/go?a=1&amp;b=&lt;2&gt;</code>"));
        let text = status_text("https://safe.example/go?a=1&b=2", Some(0));
        assert!(text.contains("a=1&amp;b=2"));
    }

    #[test]
    fn status_reports_album_collection() {
        assert!(status_text("x", Some(3)).contains("(3 in progress)"));
        assert!(status_text("x", None).contains("unavailable"));
    }
}
