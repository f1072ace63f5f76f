use std::sync::Arc;
use talky_backend::infrastructure::config::{Config, LogFormat};
use talky_backend::infrastructure::http::start_http_server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; missing required credentials abort startup here,
    // before anything can serve traffic.
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Talky Backend on {}:{}",
        config.host,
        config.port
    );

    // Create AWS Polly client
    tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

    let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
    let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
    if !has_access_key || !has_secret_key {
        tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
    tracing::info!("AWS Polly client initialized");

    let openai_client = Arc::new(async_openai::Client::with_config(
        async_openai::config::OpenAIConfig::new().with_api_key(config.openai_api_key.clone()),
    ));

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject provider clients)
    tracing::info!("Instantiating repositories...");
    let primary_repo = Arc::new(
        talky_backend::infrastructure::repositories::PollySpeechRepository::new(
            polly_client.clone(),
        ),
    );
    let fallback_repo = Arc::new(
        talky_backend::infrastructure::repositories::ElevenLabsSpeechRepository::new(
            config.eleven_labs_api_key.clone(),
            config.eleven_labs_voice_id.clone(),
            config.eleven_labs_model_id.clone(),
            config.audio_dir.clone(),
            config.ffmpeg_path.clone(),
            config.rhubarb_path.clone(),
        ),
    );
    let chat_repo = Arc::new(
        talky_backend::infrastructure::repositories::OpenAiChatRepository::new(
            openai_client,
            config.openai_model.clone(),
        ),
    );

    // 2. Instantiate services (inject repositories and the cache)
    tracing::info!("Instantiating services...");
    let speech_cache = Arc::new(talky_backend::domain::speech::SpeechCache::new());
    let speech_service = Arc::new(talky_backend::domain::speech::SpeechService::new(
        primary_repo,
        fallback_repo.clone(),
        speech_cache,
    ));
    let chat_service = Arc::new(talky_backend::domain::chat::ChatService::new(
        chat_repo,
        speech_service,
        config.polly_voice_id.clone(),
        config.locale_code.clone(),
        config.audio_dir.clone(),
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let chat_controller = Arc::new(talky_backend::controllers::chat::ChatController::new(
        chat_service,
        fallback_repo,
    ));

    // Start HTTP server with all routes
    start_http_server(config, chat_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "talky_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "talky_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
