//! Routing table from command name or content kind to a handler.
//!
//! Commands are looked up by exact (lowercased) name first; everything else by
//! content kind. Anything unregistered goes to the fallback reply.

use teloxide::types::BotCommand;

use crate::bot::event::{Content, ContentKind};
use crate::bot::telegram::TextFormat;

/// A fixed message sent without calling any backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticReply {
    pub text: &'static str,
    pub format: TextFormat,
}

impl StaticReply {
    pub const fn plain(text: &'static str) -> Self {
        Self { text, format: TextFormat::Plain }
    }

    pub const fn html(text: &'static str) -> Self {
        Self { text, format: TextFormat::Html }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    Static(StaticReply),
    /// Welcome text written by the completion backend.
    GeneratedWelcome,
    /// Text question answered from the company dataset.
    Query,
    Voice,
    Photo,
    /// Text answered with an empathetic canned reply.
    Empathy,
}

impl Handler {
    pub fn name(&self) -> &'static str {
        match self {
            Handler::Static(_) => "static",
            Handler::GeneratedWelcome => "welcome",
            Handler::Query => "query",
            Handler::Voice => "voice",
            Handler::Photo => "photo",
            Handler::Empathy => "empathy",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandRoute {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: Handler,
}

#[derive(Debug, Clone)]
pub struct Router {
    commands: Vec<CommandRoute>,
    content: Vec<(ContentKind, Handler)>,
    fallback: Handler,
    fallback_reply: StaticReply,
}

impl Router {
    pub fn new(fallback: StaticReply) -> Self {
        Self {
            commands: Vec::new(),
            content: Vec::new(),
            fallback: Handler::Static(fallback),
            fallback_reply: fallback,
        }
    }

    pub fn command(mut self, name: &'static str, description: &'static str, handler: Handler) -> Self {
        self.commands.push(CommandRoute { name, description, handler });
        self
    }

    pub fn content(mut self, kind: ContentKind, handler: Handler) -> Self {
        self.content.push((kind, handler));
        self
    }

    pub fn route(&self, content: &Content) -> &Handler {
        let found = match content {
            Content::Command { name, .. } => self
                .commands
                .iter()
                .find(|c| c.name == name.as_str())
                .map(|c| &c.handler),
            other => self
                .content
                .iter()
                .find(|(kind, _)| *kind == other.kind())
                .map(|(_, handler)| handler),
        };
        found.unwrap_or(&self.fallback)
    }

    /// Reply for anything the table has no handler for.
    pub fn fallback(&self) -> StaticReply {
        self.fallback_reply
    }

    pub fn commands(&self) -> &[CommandRoute] {
        &self.commands
    }

    /// Command list for Telegram's command menu.
    pub fn bot_commands(&self) -> Vec<BotCommand> {
        self.commands
            .iter()
            .map(|c| BotCommand::new(c.name, c.description))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELCOME: StaticReply = StaticReply::plain("bienvenido");
    const UNKNOWN: StaticReply = StaticReply::plain("no entiendo");

    fn router() -> Router {
        Router::new(UNKNOWN)
            .command("start", "inicio", Handler::Static(WELCOME))
            .command("bienvenida", "bienvenida generada", Handler::GeneratedWelcome)
            .content(ContentKind::Text, Handler::Query)
            .content(ContentKind::Voice, Handler::Voice)
    }

    fn command(name: &str) -> Content {
        Content::Command { name: name.into() }
    }

    #[test]
    fn test_registered_commands() {
        let r = router();
        assert_eq!(r.route(&command("start")), &Handler::Static(WELCOME));
        assert_eq!(r.route(&command("bienvenida")), &Handler::GeneratedWelcome);
    }

    #[test]
    fn test_unregistered_command_falls_through() {
        assert_eq!(router().route(&command("precios")), &Handler::Static(UNKNOWN));
    }

    #[test]
    fn test_command_never_routed_as_text() {
        // a known text handler must not pick up unknown commands
        assert_ne!(router().route(&command("whatever")), &Handler::Query);
    }

    #[test]
    fn test_content_kinds() {
        let r = router();
        assert_eq!(r.route(&Content::Text("hola".into())), &Handler::Query);
        assert_eq!(
            r.route(&Content::Voice { file_id: "v".into(), size: 10 }),
            &Handler::Voice
        );
        assert_eq!(
            r.route(&Content::Photo { file_id: "p".into(), size: 10 }),
            &Handler::Static(UNKNOWN)
        );
        assert_eq!(r.route(&Content::Unsupported), &Handler::Static(UNKNOWN));
    }

    #[test]
    fn test_fallback_reply() {
        assert_eq!(router().fallback(), UNKNOWN);
        assert_eq!(router().route(&Content::Unsupported).name(), "static");
    }

    #[test]
    fn test_bot_commands_menu() {
        let menu = router().bot_commands();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].command, "start");
        assert_eq!(menu[0].description, "inicio");
    }
}
