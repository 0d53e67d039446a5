//! Request types and traits for the hosted AI backends.
//!
//! Every backend call returns `Result<_, BackendError>`; callers decide which
//! fallback message the user sees.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug)]
pub enum BackendError {
    Http(String),
    Api { status: u16, body: String },
    Parse(String),
    Io(String),
    Empty,
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Http(e) => write!(f, "HTTP error: {e}"),
            BackendError::Api { status, body } => write!(f, "API error: {status}: {body}"),
            BackendError::Parse(e) => write!(f, "Parse error: {e}"),
            BackendError::Io(e) => write!(f, "I/O error: {e}"),
            BackendError::Empty => write!(f, "Empty response"),
        }
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Plain text, or a list of text and image parts for vision models.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self { role, content: MessageContent::Text(text.into()) }
    }
}

#[cfg(test)]
impl ChatMessage {
    /// All text carried by this message, parts joined by newlines.
    pub fn text_content(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One chat-completion call: ordered messages plus sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[cfg(test)]
impl CompletionRequest {
    /// Text of the first message with the given role.
    pub fn text_for(&self, role: Role) -> Option<String> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(ChatMessage::text_content)
    }

    pub fn image_urls(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match &m.content {
                MessageContent::Parts(parts) => Some(parts),
                MessageContent::Text(_) => None,
            })
            .flatten()
            .filter_map(|p| match p {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                ContentPart::Text { .. } => None,
            })
            .collect()
    }
}

/// Audio on disk plus the model and language hint to transcribe it with.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptionRequest<'a> {
    pub audio: &'a Path,
    pub model: &'a str,
    pub language: &'a str,
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BackendError>;
}

#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    async fn transcribe(&self, request: TranscriptionRequest<'_>) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_serializes_as_string() {
        let msg = ChatMessage::text(Role::System, "hola");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "hola"}));
    }

    #[test]
    fn test_image_parts_serialize_openai_style() {
        let msg = ChatMessage {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: "describe".into() },
                ContentPart::ImageUrl { image_url: ImageUrl { url: "data:image/jpeg;base64,AAAA".into() } },
            ]),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "describe"},
                    {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,AAAA"}}
                ]
            })
        );
    }

    #[test]
    fn test_request_accessors() {
        let request = CompletionRequest {
            model: "m".into(),
            messages: vec![
                ChatMessage::text(Role::System, "rules"),
                ChatMessage {
                    role: Role::User,
                    content: MessageContent::Parts(vec![
                        ContentPart::Text { text: "look".into() },
                        ContentPart::ImageUrl { image_url: ImageUrl { url: "data:x".into() } },
                    ]),
                },
            ],
            temperature: 0.3,
            max_tokens: 10,
        };
        assert_eq!(request.text_for(Role::System).as_deref(), Some("rules"));
        assert_eq!(request.text_for(Role::User).as_deref(), Some("look"));
        assert_eq!(request.image_urls(), vec!["data:x"]);
    }
}
