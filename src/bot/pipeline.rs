//! Response pipeline: one inbound event in, one terminal reply out.
//!
//! Every backend failure is logged and turned into the fixed fallback text of
//! the path that failed. Notices (transcript echo, image acknowledgement) may
//! precede the reply but never replace it.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, info, warn};

use crate::backend::{CompletionBackend, CompletionRequest, TranscriptionBackend, TranscriptionRequest};
use crate::bot::empathy::pick;
use crate::bot::event::{Content, InboundEvent};
use crate::bot::profile::BotProfile;
use crate::bot::prompt::{image_data_uri, PromptBuilder};
use crate::bot::router::{Handler, StaticReply};
use crate::bot::scratch::AudioScratch;
use crate::bot::telegram::{ChatTransport, TextFormat};
use crate::config::ModelConfig;
use crate::dataset::CompanyFacts;
use crate::sentiment::SentimentClassifier;

/// Largest voice note we try to transcribe (Whisper's upload limit).
pub const MAX_VOICE_BYTES: u32 = 25 * 1024 * 1024;

/// Everything the handlers need, built once at startup and shared read-only.
pub struct AppContext {
    pub profile: BotProfile,
    pub models: ModelConfig,
    pub support_contact: String,
    /// `None` when the dataset could not be loaded and startup was lenient.
    pub facts: Option<Arc<CompanyFacts>>,
    pub transport: Arc<dyn ChatTransport>,
    pub completion: Arc<dyn CompletionBackend>,
    pub transcription: Arc<dyn TranscriptionBackend>,
    pub sentiment: Option<Arc<dyn SentimentClassifier>>,
    pub bot_username: Option<String>,
}

impl AppContext {
    fn prompts(&self) -> PromptBuilder<'_> {
        PromptBuilder::new(&self.models, &self.support_contact)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), format: TextFormat::Plain }
    }
}

impl From<StaticReply> for Reply {
    fn from(reply: StaticReply) -> Self {
        Self { text: reply.text.to_string(), format: reply.format }
    }
}

/// Dispatcher endpoint for new messages.
pub async fn handle_message(msg: Message, ctx: Arc<AppContext>) -> ResponseResult<()> {
    match InboundEvent::from_message(&msg, ctx.bot_username.as_deref()) {
        Some(event) => handle_event(&ctx, event).await,
        None => debug!("Ignoring command for another bot in chat {}", msg.chat.id),
    }
    Ok(())
}

pub async fn handle_event(ctx: &AppContext, event: InboundEvent) {
    let handler = ctx.profile.router.route(&event.content);
    info!(
        "📨 chat {} msg {}: {:?} → {}",
        event.chat_id,
        event.message_id,
        event.content.kind(),
        handler.name()
    );

    let reply = respond(ctx, &event, handler).await;
    if let Err(e) = ctx
        .transport
        .send_text(event.chat_id, Some(event.message_id), &reply.text, reply.format)
        .await
    {
        warn!("Reply to chat {} was not delivered: {e}", event.chat_id);
    }
}

/// Run `handler` on `event` and return the terminal reply.
pub async fn respond(ctx: &AppContext, event: &InboundEvent, handler: &Handler) -> Reply {
    match (handler, &event.content) {
        (Handler::Static(reply), _) => Reply::from(*reply),
        (Handler::GeneratedWelcome, _) => welcome(ctx, event.chat_id).await,
        (Handler::Query, Content::Text(text)) => answer_text(ctx, event.chat_id, text).await,
        (Handler::Empathy, Content::Text(text)) => empathize(ctx, event.chat_id, text).await,
        (Handler::Voice, Content::Voice { file_id, size }) => answer_voice(ctx, event, file_id, *size).await,
        (Handler::Photo, Content::Photo { file_id, size }) => answer_photo(ctx, event, file_id, *size).await,
        (handler, content) => {
            warn!("{} handler cannot take {:?} content", handler.name(), content.kind());
            Reply::from(ctx.profile.router.fallback())
        }
    }
}

async fn answer_text(ctx: &AppContext, chat_id: i64, text: &str) -> Reply {
    ctx.transport.typing(chat_id).await;

    if ctx.profile.sentiment_gate
        && let Some(reply) = emotional_reply(ctx, text).await
    {
        return reply;
    }
    query(ctx, text, ctx.profile.fallbacks.query_failed).await
}

/// Canned empathetic reply when the classifier is confident the text is
/// emotional. `None` means answer normally.
async fn emotional_reply(ctx: &AppContext, text: &str) -> Option<Reply> {
    let table = ctx.profile.empathy?;
    let classifier = ctx.sentiment.as_ref()?;

    match classifier.classify(text).await {
        Ok(sentiment) if sentiment.is_strong() => {
            info!("💬 Emotional message ({:?} {:.2}), replying with support", sentiment.label, sentiment.score);
            Some(Reply::plain(table.reply(text, sentiment.label)))
        }
        Ok(sentiment) => {
            debug!("Sentiment {:?} {:.2} below threshold", sentiment.label, sentiment.score);
            None
        }
        Err(e) => {
            warn!("Sentiment analysis failed, answering normally: {e}");
            None
        }
    }
}

/// Answer `question` from the company dataset.
async fn query(ctx: &AppContext, question: &str, failure: &'static str) -> Reply {
    let Some(facts) = ctx.facts.as_deref() else {
        return Reply::plain(ctx.profile.fallbacks.dataset_missing);
    };
    let request = ctx.prompts().faq(facts, ctx.profile.faq_rules, question);
    complete(ctx, &request).await.map_or_else(|| Reply::plain(failure), Reply::plain)
}

async fn complete(ctx: &AppContext, request: &CompletionRequest) -> Option<String> {
    match ctx.completion.complete(request).await {
        Ok(text) => {
            debug!("Completion returned {} chars", text.chars().count());
            Some(text)
        }
        Err(e) => {
            warn!("Completion failed: {e}");
            None
        }
    }
}

async fn welcome(ctx: &AppContext, chat_id: i64) -> Reply {
    let fallbacks = &ctx.profile.fallbacks;
    let Some(facts) = ctx.facts.as_deref() else {
        return Reply::plain(fallbacks.dataset_missing);
    };
    ctx.transport.typing(chat_id).await;

    let request = ctx.prompts().welcome(facts, ctx.profile.faq_rules);
    complete(ctx, &request)
        .await
        .map_or_else(|| Reply::plain(fallbacks.welcome_failed), Reply::plain)
}

async fn answer_voice(ctx: &AppContext, event: &InboundEvent, file_id: &str, size: u32) -> Reply {
    let fallbacks = &ctx.profile.fallbacks;
    if ctx.facts.is_none() {
        return Reply::plain(fallbacks.dataset_missing);
    }
    ctx.transport.typing(event.chat_id).await;

    let Some(transcript) = transcribe(ctx, file_id, size).await else {
        return Reply::plain(fallbacks.transcription_failed);
    };
    if let Some(prefix) = ctx.profile.transcript_echo {
        notify(ctx, event, &format!("{prefix}{transcript}")).await;
    }
    query(ctx, &transcript, fallbacks.voice_query_failed).await
}

/// Download, stage and transcribe a voice note. The scratch file is gone by
/// the time this returns.
async fn transcribe(ctx: &AppContext, file_id: &str, size: u32) -> Option<String> {
    if size > MAX_VOICE_BYTES {
        warn!("Voice note too large to transcribe ({size} bytes)");
        return None;
    }

    let audio = match ctx.transport.download_file(file_id).await {
        Ok(audio) => audio,
        Err(e) => {
            warn!("Voice download failed: {e}");
            return None;
        }
    };
    if audio.len() > MAX_VOICE_BYTES as usize {
        warn!("Voice note too large to transcribe ({} bytes)", audio.len());
        return None;
    }

    let scratch = match AudioScratch::write(&audio) {
        Ok(scratch) => scratch,
        Err(e) => {
            warn!("Failed to stage voice note: {e}");
            return None;
        }
    };
    let request = TranscriptionRequest {
        audio: scratch.path(),
        model: &ctx.models.transcription,
        language: &ctx.models.language,
    };

    match ctx.transcription.transcribe(request).await {
        Ok(text) if !text.trim().is_empty() => {
            info!("🎤 Transcribed {} bytes of audio into {} chars", audio.len(), text.chars().count());
            Some(text.trim().to_string())
        }
        Ok(_) => {
            warn!("Transcription came back empty");
            None
        }
        Err(e) => {
            warn!("Transcription failed: {e}");
            None
        }
    }
}

async fn answer_photo(ctx: &AppContext, event: &InboundEvent, file_id: &str, size: u32) -> Reply {
    let profile = &ctx.profile;
    debug!("Photo {file_id} ({size} bytes)");
    if let Some(ack) = profile.photo_ack {
        notify(ctx, event, ack).await;
    }
    ctx.transport.typing(event.chat_id).await;

    let image = match ctx.transport.download_file(file_id).await {
        Ok(image) => image,
        Err(e) => {
            warn!("Image download failed: {e}");
            return Reply::plain(profile.fallbacks.image_download_failed);
        }
    };
    let Some(data_uri) = image_data_uri(&image) else {
        warn!("Downloaded image is empty");
        return Reply::plain(profile.fallbacks.image_unreadable);
    };

    let request = ctx.prompts().image(profile.image_task, data_uri);
    match complete(ctx, &request).await {
        Some(analysis) => Reply::plain(format!("{}{}", profile.photo_heading, analysis)),
        None => Reply::plain(profile.fallbacks.image_failed),
    }
}

async fn empathize(ctx: &AppContext, chat_id: i64, text: &str) -> Reply {
    let Some(table) = ctx.profile.empathy else {
        return Reply::from(ctx.profile.router.fallback());
    };
    ctx.transport.typing(chat_id).await;

    if let Some(bucket) = table.keyword_bucket(text) {
        return Reply::plain(pick(bucket));
    }

    let failed = Reply::plain(ctx.profile.fallbacks.sentiment_failed);
    let Some(classifier) = ctx.sentiment.as_ref() else {
        warn!("No sentiment classifier configured");
        return failed;
    };
    match classifier.classify(text).await {
        Ok(sentiment) => {
            debug!("Sentiment {:?} {:.2}", sentiment.label, sentiment.score);
            Reply::plain(pick(table.label_bucket(sentiment.label)))
        }
        Err(e) => {
            warn!("Sentiment analysis failed: {e}");
            failed
        }
    }
}

/// Progress notice quoting the user's message. Failures are only logged.
async fn notify(ctx: &AppContext, event: &InboundEvent, text: &str) {
    if let Err(e) = ctx
        .transport
        .send_text(event.chat_id, Some(event.message_id), text, TextFormat::Plain)
        .await
    {
        warn!("Notice to chat {} was not delivered: {e}", event.chat_id);
    }
}
