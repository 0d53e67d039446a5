//! Bot module - routes Telegram messages to the AI backends and replies.

pub mod empathy;
pub mod event;
pub mod pipeline;
pub mod profile;
pub mod prompt;
pub mod router;
pub mod scratch;
pub mod telegram;


pub use event::{Content, InboundEvent};
pub use pipeline::{handle_event, handle_message, AppContext, Reply};
pub use profile::BotProfile;
pub use telegram::{ChatTransport, TelegramClient, TextFormat};
