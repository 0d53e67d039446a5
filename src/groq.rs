//! Groq client: OpenAI-compatible chat completions and Whisper transcription.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::backend::{
    BackendError, CompletionBackend, CompletionRequest, TranscriptionBackend, TranscriptionRequest,
};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct Client {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl Client {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api { status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionBackend for Client {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BackendError> {
        debug!(
            "Completion request: model={} messages={} max_tokens={}",
            request.model,
            request.messages.len(),
            request.max_tokens
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let api_response: CompletionResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(BackendError::Empty)
    }
}

#[async_trait]
impl TranscriptionBackend for Client {
    async fn transcribe(&self, request: TranscriptionRequest<'_>) -> Result<String, BackendError> {
        let audio = tokio::fs::read(request.audio)
            .await
            .map_err(|e| BackendError::Io(e.to_string()))?;
        debug!("Transcribing {} bytes with {}", audio.len(), request.model);

        let file_name = request
            .audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("voice.ogg")
            .to_string();
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/ogg")
            .map_err(|e| BackendError::Http(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("model", request.model.to_string())
            .text("language", request.language.to_string())
            .text("response_format", "json")
            .part("file", part);

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let transcription: TranscriptionResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(transcription.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = Client::new("key".into(), "https://example.com/v1/".into());
        assert_eq!(client.base_url, "https://example.com/v1");
    }

    #[test]
    fn test_completion_response_parses_null_content() {
        let parsed: CompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn test_transcription_response_parses() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text": " hola mundo ", "x_groq": {"id": "req_1"}}"#).unwrap();
        assert_eq!(parsed.text.trim(), "hola mundo");
    }
}
