use anyhow::Result;
use clap::Parser;
use interview_coach::llm::{OllamaClient, OllamaConfig, SuggestionBackend};
use interview_coach::stt::{RemoteSpeechToText, RemoteSttConfig, SpeechToText};
use interview_coach::{create_router, AppState, Config, SessionConfig, SessionManager};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "interview-coach", about = "Real-time interview coaching service")]
struct Args {
    /// Configuration file path, without extension
    #[arg(long, default_value = "config/interview-coach")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Speech-to-text: {} via {}",
        cfg.stt.model, cfg.stt.endpoint
    );
    info!("Suggestions: {} via {}", cfg.llm.model, cfg.llm.endpoint);

    let stt: Arc<dyn SpeechToText> = Arc::new(RemoteSpeechToText::new(RemoteSttConfig {
        endpoint: cfg.stt.endpoint.clone(),
        model: cfg.stt.model.clone(),
        api_key: cfg.stt.api_key.clone(),
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
    }));

    let llm: Arc<dyn SuggestionBackend> = Arc::new(OllamaClient::new(OllamaConfig {
        endpoint: cfg.llm.endpoint.clone(),
        model: cfg.llm.model.clone(),
        temperature: cfg.llm.temperature,
        num_predict: cfg.llm.num_predict,
    }));

    let manager = Arc::new(SessionManager::new(
        stt,
        llm,
        SessionConfig::from_app_config(&cfg),
    ));
    let app = create_router(AppState::new(manager));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
