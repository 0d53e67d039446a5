use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::backend::BackendError;

pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";

/// Confidence a polar label must exceed before the corporate bot answers
/// with an empathetic reply instead of an FAQ answer.
pub const EMOTION_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Accepts robertuito's POS/NEG/NEU and the spelled-out variants.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POS" | "POSITIVE" => Some(SentimentLabel::Positive),
            "NEG" | "NEGATIVE" => Some(SentimentLabel::Negative),
            "NEU" | "NEUTRAL" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    pub fn is_polar(&self) -> bool {
        !matches!(self, SentimentLabel::Neutral)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f32,
}

impl Sentiment {
    pub fn is_strong(&self) -> bool {
        self.label.is_polar() && self.score > EMOTION_THRESHOLD
    }
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment, BackendError>;
}

/// Hosted text-classification pipeline on the Hugging Face inference API.
pub struct HuggingFaceClassifier {
    api_key: String,
    url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl HuggingFaceClassifier {
    pub fn new(api_key: String, endpoint: &str, model: &str) -> Self {
        Self {
            api_key,
            url: format!("{}/{}", endpoint.trim_end_matches('/'), model),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment, BackendError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api { status, body });
        }

        let parsed: ClassifierResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        let sentiment = best_label(parsed)?;
        debug!("Sentiment: {:?} ({:.2})", sentiment.label, sentiment.score);
        Ok(sentiment)
    }
}

/// Highest-scoring label of the first input.
fn best_label(response: ClassifierResponse) -> Result<Sentiment, BackendError> {
    let scores = match response {
        ClassifierResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
        ClassifierResponse::Flat(scores) => scores,
    };
    let best = scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or(BackendError::Empty)?;
    let label = SentimentLabel::parse(&best.label)
        .ok_or_else(|| BackendError::Parse(format!("unknown sentiment label '{}'", best.label)))?;
    Ok(Sentiment { label, score: best.score })
}
