use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::groq;
use crate::sentiment;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

/// Which bot variant the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    /// Company assistant: FAQ answers, emotional support, voice and image description.
    #[default]
    Corporate,
    /// FAQ answers over text and voice, with a generated welcome.
    Faq,
    /// Describes any image it receives.
    Describe,
    /// Diagnoses technical faults shown in screenshots and photos.
    Diagnose,
    /// Empathetic replies driven by sentiment analysis only.
    Empathy,
}

impl BotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotMode::Corporate => "corporate",
            BotMode::Faq => "faq",
            BotMode::Describe => "describe",
            BotMode::Diagnose => "diagnose",
            BotMode::Empathy => "empathy",
        }
    }

    /// Whether the mode calls the completion or transcription endpoints.
    pub fn uses_groq(&self) -> bool {
        !matches!(self, BotMode::Empathy)
    }

    /// Whether the mode answers from the company dataset.
    pub fn uses_dataset(&self) -> bool {
        matches!(self, BotMode::Corporate | BotMode::Faq)
    }

    /// Whether the mode cannot work at all without a sentiment classifier.
    pub fn requires_classifier(&self) -> bool {
        matches!(self, BotMode::Empathy)
    }
}

impl fmt::Display for BotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model identifiers and the transcription language hint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub chat: String,
    pub vision: String,
    pub transcription: String,
    pub sentiment: String,
    pub language: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat: "llama-3.3-70b-versatile".to_string(),
            vision: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            transcription: "whisper-large-v3".to_string(),
            sentiment: "pysentimiento/robertuito-sentiment-analysis".to_string(),
            language: "es".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mode: BotMode,
    /// Falls back to TELEGRAM_BOT_TOKEN when empty.
    #[serde(default)]
    telegram_bot_token: String,
    /// Falls back to GROQ_API_KEY when empty.
    #[serde(default)]
    groq_api_key: String,
    /// Falls back to HUGGINGFACE_API_KEY when empty. Without it the corporate
    /// bot skips the sentiment gate.
    #[serde(default)]
    huggingface_api_key: String,
    /// Company dataset (JSON). Defaults to "dataset.json".
    dataset_path: Option<String>,
    /// Refuse to start when the dataset cannot be loaded.
    #[serde(default = "default_strict_dataset")]
    strict_dataset: bool,
    /// Where users are sent when the dataset has no answer.
    support_contact: Option<String>,
    /// Directory for state files (logs). Defaults to current directory.
    data_dir: Option<String>,
    /// Delay before reconnecting to Telegram after a transport failure.
    #[serde(default = "default_restart_delay_secs")]
    restart_delay_secs: u64,
    groq_base_url: Option<String>,
    sentiment_endpoint: Option<String>,
    #[serde(default)]
    models: ModelConfig,
}

fn default_strict_dataset() -> bool {
    true
}

fn default_restart_delay_secs() -> u64 {
    5
}

pub const DEFAULT_SUPPORT_CONTACT: &str = "info@tecnomant.com.ar";

pub struct Config {
    /// Path to the config file that was loaded.
    pub config_path: PathBuf,
    pub mode: BotMode,
    pub telegram_bot_token: String,
    pub groq_api_key: String,
    pub huggingface_api_key: Option<String>,
    pub dataset_path: PathBuf,
    pub strict_dataset: bool,
    pub support_contact: String,
    /// Directory for state files (logs).
    pub data_dir: PathBuf,
    pub restart_delay: Duration,
    pub groq_base_url: String,
    pub sentiment_endpoint: String,
    pub models: ModelConfig,
}

impl Config {
    /// Load the config file, reading missing secrets from the process environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<P, F>(path: P, env: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        let secret = |value: String, key: &str| -> String {
            let value = value.trim().to_string();
            if value.is_empty() {
                env(key).map(|v| v.trim().to_string()).unwrap_or_default()
            } else {
                value
            }
        };
        let telegram_bot_token = secret(file.telegram_bot_token, "TELEGRAM_BOT_TOKEN");
        let groq_api_key = secret(file.groq_api_key, "GROQ_API_KEY");
        let huggingface_api_key = secret(file.huggingface_api_key, "HUGGINGFACE_API_KEY");

        // Validate required fields
        if telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegram_bot_token is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }
        if file.mode.uses_groq() && groq_api_key.is_empty() {
            return Err(ConfigError::Validation(format!(
                "groq_api_key is required in {} mode",
                file.mode
            )));
        }
        if file.mode.requires_classifier() && huggingface_api_key.is_empty() {
            return Err(ConfigError::Validation(format!(
                "huggingface_api_key is required in {} mode",
                file.mode
            )));
        }
        if file.restart_delay_secs == 0 {
            return Err(ConfigError::Validation("restart_delay_secs must be at least 1".into()));
        }

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let dataset_path = file
            .dataset_path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("dataset.json"));

        Ok(Self {
            config_path,
            mode: file.mode,
            telegram_bot_token,
            groq_api_key,
            huggingface_api_key: Some(huggingface_api_key).filter(|k| !k.is_empty()),
            dataset_path,
            strict_dataset: file.strict_dataset,
            support_contact: file
                .support_contact
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SUPPORT_CONTACT.to_string()),
            data_dir,
            restart_delay: Duration::from_secs(file.restart_delay_secs),
            groq_base_url: file
                .groq_base_url
                .unwrap_or_else(|| groq::DEFAULT_BASE_URL.to_string()),
            sentiment_endpoint: file
                .sentiment_endpoint
                .unwrap_or_else(|| sentiment::DEFAULT_ENDPOINT.to_string()),
            models: file.models,
        })
    }
}
