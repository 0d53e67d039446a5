//! Telegram transport using teloxide.

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, FileId, MessageId, ParseMode, ReplyParameters};
use tracing::{debug, warn};

/// Telegram rejects messages longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// What the pipeline needs from the chat transport.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Show the "typing..." indicator. Failures are only logged.
    async fn typing(&self, chat_id: i64);

    async fn send_text(
        &self,
        chat_id: i64,
        reply_to_message_id: Option<i32>,
        text: &str,
        format: TextFormat,
    ) -> Result<(), String>;

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, String>;
}

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn typing(&self, chat_id: i64) {
        if let Err(e) = self.bot.send_chat_action(ChatId(chat_id), ChatAction::Typing).await {
            warn!("Failed to send typing indicator: {e}");
        }
    }

    async fn send_text(
        &self,
        chat_id: i64,
        reply_to_message_id: Option<i32>,
        text: &str,
        format: TextFormat,
    ) -> Result<(), String> {
        let parts = split_message(text, MAX_MESSAGE_CHARS);
        if parts.len() > 1 {
            debug!("Reply is {} chars, sending in {} parts", text.chars().count(), parts.len());
        }

        for (i, part) in parts.iter().enumerate() {
            let mut request = self.bot.send_message(ChatId(chat_id), part);
            if format == TextFormat::Html {
                request = request.parse_mode(ParseMode::Html);
            }
            // Only the first part quotes the user's message
            if let (0, Some(msg_id)) = (i, reply_to_message_id) {
                request = request.reply_parameters(ReplyParameters::new(MessageId(msg_id)));
            }

            request.await.map_err(|e| {
                let msg = format!("Failed to send: {e}");
                warn!("{}", msg);
                msg
            })?;
        }
        Ok(())
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, String> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| format!("Failed to get file info: {e}"))?;

        let mut data = Vec::new();
        self.bot
            .download_file(&file.path, &mut data)
            .await
            .map_err(|e| format!("Failed to download file: {e}"))?;

        debug!("📥 Downloaded {} ({} bytes)", file.path, data.len());
        Ok(data)
    }
}

/// Split `text` into chunks of at most `max_chars` characters, preferring to
/// break at a newline.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_chars {
        let hard = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = rest[..hard].rfind('\n').filter(|&i| i > 0).unwrap_or(hard);
        parts.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start_matches('\n');
    }

    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}
