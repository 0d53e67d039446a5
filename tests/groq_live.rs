//! Live tests against the hosted APIs.
//!
//! These tests require GROQ_API_KEY (and HUGGINGFACE_API_KEY for the
//! classifier test) and are skipped without them.
//!
//! Run with: cargo test --features integ_test --test groq_live

#[cfg(feature = "integ_test")]
mod tests {
    use tecnobot::backend::{CompletionBackend, Role};
    use tecnobot::bot::prompt::{FaqRules, PromptBuilder};
    use tecnobot::config::ModelConfig;
    use tecnobot::dataset::CompanyFacts;
    use tecnobot::groq::{Client, DEFAULT_BASE_URL};
    use tecnobot::sentiment::{HuggingFaceClassifier, SentimentClassifier, SentimentLabel, DEFAULT_ENDPOINT};

    fn key(name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(key) if !key.is_empty() => Some(key),
            _ => {
                eprintln!("Skipping test: {name} not set");
                None
            }
        }
    }

    fn facts() -> CompanyFacts {
        CompanyFacts::from_value(serde_json::json!({
            "company_info": {"name": "TecnoMant", "address": "Av. Colón 1234, Córdoba"},
            "services": ["Mantenimiento preventivo", "Diagnóstico de fallas"]
        }))
    }

    #[tokio::test]
    async fn test_faq_answer_from_dataset() {
        let Some(api_key) = key("GROQ_API_KEY") else { return };
        let client = Client::new(api_key, DEFAULT_BASE_URL.to_string());
        let models = ModelConfig::default();

        let request = PromptBuilder::new(&models, "info@tecnomant.com.ar")
            .faq(&facts(), FaqRules::Brief, "¿En qué ciudad están?");
        assert_eq!(request.messages[0].role, Role::System);

        let answer = client.complete(&request).await.expect("completion failed");
        assert!(answer.contains("Córdoba"), "unexpected answer: {answer}");
    }

    #[tokio::test]
    async fn test_bad_key_is_api_error() {
        let Some(_) = key("GROQ_API_KEY") else { return };
        let client = Client::new("gsk_invalid".to_string(), DEFAULT_BASE_URL.to_string());
        let models = ModelConfig::default();
        let request = PromptBuilder::new(&models, "x@y.z").faq(&facts(), FaqRules::Brief, "hola");

        let err = client.complete(&request).await.unwrap_err();
        assert!(err.to_string().contains("401"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_classifier_strong_negative() {
        let Some(api_key) = key("HUGGINGFACE_API_KEY") else { return };
        let models = ModelConfig::default();
        let classifier = HuggingFaceClassifier::new(api_key, DEFAULT_ENDPOINT, &models.sentiment);

        let sentiment = classifier
            .classify("Odio este día, todo me sale horrible")
            .await
            .expect("classification failed");
        assert_eq!(sentiment.label, SentimentLabel::Negative);
    }
}
