//! Inbound events: the parts of a Telegram message the pipeline acts on.

use teloxide::types::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Command,
    Text,
    Voice,
    Photo,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// `/name`, lowercased and without the `@bot` suffix. Arguments are dropped.
    Command { name: String },
    Text(String),
    Voice { file_id: String, size: u32 },
    /// Highest resolution variant of the photo.
    Photo { file_id: String, size: u32 },
    Unsupported,
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Command { .. } => ContentKind::Command,
            Content::Text(_) => ContentKind::Text,
            Content::Voice { .. } => ContentKind::Voice,
            Content::Photo { .. } => ContentKind::Photo,
            Content::Unsupported => ContentKind::Other,
        }
    }
}

/// One received message, discarded after its reply is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub message_id: i32,
    pub content: Content,
}

/// Result of looking at a text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedText {
    Command { name: String },
    /// A command addressed to some other bot (`/start@otherbot`).
    ForeignCommand,
    Plain,
}

pub fn parse_text(text: &str, bot_username: Option<&str>) -> ParsedText {
    let Some(rest) = text.strip_prefix('/') else {
        return ParsedText::Plain;
    };

    let head = rest.split(char::is_whitespace).next().unwrap_or(rest);
    let (name, target) = match head.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (head, None),
    };
    if name.is_empty() {
        return ParsedText::Plain;
    }
    if let (Some(target), Some(me)) = (target, bot_username)
        && !target.eq_ignore_ascii_case(me)
    {
        return ParsedText::ForeignCommand;
    }

    ParsedText::Command { name: name.to_lowercase() }
}

impl InboundEvent {
    /// Build an event from a Telegram message. Returns `None` for messages
    /// that are not meant for this bot.
    pub fn from_message(msg: &Message, bot_username: Option<&str>) -> Option<Self> {
        let content = if let Some(text) = msg.text() {
            match parse_text(text, bot_username) {
                ParsedText::Command { name } => Content::Command { name },
                ParsedText::ForeignCommand => return None,
                ParsedText::Plain => Content::Text(text.to_string()),
            }
        } else if let Some(voice) = msg.voice() {
            Content::Voice {
                file_id: voice.file.id.0.clone(),
                size: voice.file.size,
            }
        } else if let Some(photo) = msg
            .photo()
            .and_then(|sizes| sizes.iter().max_by_key(|p| u64::from(p.width) * u64::from(p.height)))
        {
            Content::Photo {
                file_id: photo.file.id.0.clone(),
                size: photo.file.size,
            }
        } else {
            Content::Unsupported
        };

        Some(Self {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str) -> ParsedText {
        ParsedText::Command { name: name.to_string() }
    }

    fn message(body: serde_json::Value) -> Message {
        let mut value = serde_json::json!({
            "message_id": 7,
            "date": 1700000000,
            "chat": {"id": 42, "type": "private", "first_name": "Ana"},
            "from": {"id": 42, "is_bot": false, "first_name": "Ana"}
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), body.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(value).expect("valid message JSON")
    }

    fn photo_size(id: &str, width: u32, height: u32, bytes: u32) -> serde_json::Value {
        serde_json::json!({
            "file_id": id,
            "file_unique_id": format!("u-{id}"),
            "width": width,
            "height": height,
            "file_size": bytes
        })
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_text("hola, ¿qué servicios tienen?", Some("tecnobot")), ParsedText::Plain);
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(parse_text("/start", None), command("start"));
    }

    #[test]
    fn test_command_arguments_dropped() {
        assert_eq!(parse_text("/Corporativo  ahora mismo ", None), command("corporativo"));
    }

    #[test]
    fn test_command_for_this_bot() {
        assert_eq!(parse_text("/help@TecnoBot", Some("tecnobot")), command("help"));
    }

    #[test]
    fn test_command_for_other_bot() {
        assert_eq!(parse_text("/help@otherbot", Some("tecnobot")), ParsedText::ForeignCommand);
    }

    #[test]
    fn test_suffix_stripped_when_username_unknown() {
        assert_eq!(parse_text("/help@whoever", None), command("help"));
    }

    #[test]
    fn test_lone_slash_is_text() {
        assert_eq!(parse_text("/", None), ParsedText::Plain);
        assert_eq!(parse_text("/ hola", None), ParsedText::Plain);
    }

    #[test]
    fn test_content_kind() {
        assert_eq!(Content::Text("x".into()).kind(), ContentKind::Text);
        assert_eq!(
            Content::Voice { file_id: "f".into(), size: 1 }.kind(),
            ContentKind::Voice
        );
        assert_eq!(Content::Unsupported.kind(), ContentKind::Other);
    }

    #[test]
    fn test_message_picks_largest_photo() {
        let msg = message(serde_json::json!({
            "photo": [
                photo_size("small", 90, 90, 1_000),
                photo_size("big", 1280, 960, 100_000),
                photo_size("mid", 320, 240, 10_000),
            ]
        }));

        let event = InboundEvent::from_message(&msg, Some("tecnobot")).unwrap();
        assert_eq!(event.chat_id, 42);
        assert_eq!(event.message_id, 7);
        assert_eq!(
            event.content,
            Content::Photo { file_id: "big".into(), size: 100_000 }
        );
    }

    #[test]
    fn test_message_for_other_bot_is_dropped() {
        let msg = message(serde_json::json!({"text": "/start@otherbot"}));
        assert_eq!(InboundEvent::from_message(&msg, Some("tecnobot")), None);
    }

    #[test]
    fn test_message_text_and_command() {
        let msg = message(serde_json::json!({"text": "/Start@tecnobot hola"}));
        let event = InboundEvent::from_message(&msg, Some("tecnobot")).unwrap();
        assert_eq!(event.content, Content::Command { name: "start".into() });

        let msg = message(serde_json::json!({"text": "¿Dónde están?"}));
        let event = InboundEvent::from_message(&msg, Some("tecnobot")).unwrap();
        assert_eq!(event.content, Content::Text("¿Dónde están?".into()));
    }

    #[test]
    fn test_message_voice() {
        let msg = message(serde_json::json!({
            "voice": {"file_id": "v1", "file_unique_id": "uv1", "duration": 3, "file_size": 2048}
        }));
        let event = InboundEvent::from_message(&msg, None).unwrap();
        assert_eq!(event.content, Content::Voice { file_id: "v1".into(), size: 2048 });
    }
}
