use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::Me;
use teloxide::update_listeners::Polling;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

use tecnobot::bot::{handle_message, AppContext, BotProfile, TelegramClient};
use tecnobot::config::Config;
use tecnobot::dataset::{CompanyFacts, DatasetError};
use tecnobot::groq;
use tecnobot::sentiment::{HuggingFaceClassifier, SentimentClassifier};

/// Long-polling timeout for getUpdates.
const POLL_TIMEOUT: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tecnobot.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let _guard = match init_logging(&config.data_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to open log file: {e}");
            std::process::exit(1);
        }
    };

    info!("🚀 Starting tecnobot in {} mode...", config.mode);
    info!("Loaded config from {}", config.config_path.display());

    let facts = match load_facts(&config) {
        Ok(facts) => facts,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);
    let me = wait_for_telegram(&bot, config.restart_delay).await;
    let bot_username = me.user.username.clone();
    info!("Bot user ID: {}, username: @{}", me.id, bot_username.as_deref().unwrap_or("?"));

    let profile = BotProfile::for_mode(config.mode);
    if let Err(e) = bot.set_my_commands(profile.router.bot_commands()).await {
        warn!("Failed to set commands: {e}");
    }

    let groq_client = Arc::new(groq::Client::new(
        config.groq_api_key.clone(),
        config.groq_base_url.clone(),
    ));
    let sentiment = config.huggingface_api_key.clone().map(|key| {
        Arc::new(HuggingFaceClassifier::new(
            key,
            &config.sentiment_endpoint,
            &config.models.sentiment,
        )) as Arc<dyn SentimentClassifier>
    });
    if profile.sentiment_gate && sentiment.is_none() {
        info!("No Hugging Face key, sentiment gate disabled");
    }

    let ctx = Arc::new(AppContext {
        profile,
        models: config.models.clone(),
        support_contact: config.support_contact.clone(),
        facts,
        transport: Arc::new(TelegramClient::new(bot.clone())),
        completion: groq_client.clone(),
        transcription: groq_client,
        sentiment,
        bot_username,
    });

    let restart_delay = config.restart_delay;
    let listener = Polling::builder(bot.clone())
        .timeout(POLL_TIMEOUT)
        .backoff_strategy(move |_| restart_delay)
        .build();

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    info!("Waiting for messages...");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|update| async move {
            debug!("Unhandled update: {:?}", update.kind);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Telegram polling error"),
        )
        .await;
}

/// Stdout plus a non-blocking file writer at `<data_dir>/logs/tecnobot.log`.
fn init_logging(data_dir: &Path) -> std::io::Result<WorkerGuard> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("tecnobot.log"))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    Ok(guard)
}

/// Company dataset for modes that answer from it. With `strict_dataset` off a
/// broken dataset only disables those answers.
fn load_facts(config: &Config) -> Result<Option<Arc<CompanyFacts>>, DatasetError> {
    if !config.mode.uses_dataset() {
        return Ok(None);
    }

    match CompanyFacts::load(&config.dataset_path) {
        Ok(facts) => {
            info!("🏢 Company: {}", facts.name().unwrap_or("(unnamed)"));
            Ok(Some(Arc::new(facts)))
        }
        Err(e) if !config.strict_dataset => {
            warn!("{e}; dataset answers are disabled");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Block until Telegram answers getMe, retrying with a fixed delay.
async fn wait_for_telegram(bot: &Bot, delay: Duration) -> Me {
    loop {
        match bot.get_me().await {
            Ok(me) => return me,
            Err(e) => {
                error!("Cannot reach Telegram: {e}. Retrying in {}s", delay.as_secs());
                tokio::time::sleep(delay).await;
            }
        }
    }
}
