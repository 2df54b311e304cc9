use std::net::SocketAddr;

use voicemail_relay::config::AppConfig;
use voicemail_relay::error::Result;
use voicemail_relay::webhook::{AppState, webhook_routes};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    run().await?;
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    let addr = SocketAddr::new(config.bind_addr, config.port);

    eprintln!("📞 Voicemail Relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://{}/api/webhook", addr);
    eprintln!("   Sender: {} <{}>", config.mandrill.from_name, config.mandrill.from_email);
    eprintln!(
        "   Routes: {} mapped, default: {}",
        config.routes.len(),
        config.routes.default_recipient().unwrap_or("none")
    );
    match &config.whisper {
        Some(whisper) => eprintln!(
            "   Transcription: {} ({})",
            whisper.model,
            whisper.language.as_deref().unwrap_or("auto")
        ),
        None => eprintln!("   Transcription: disabled (OPENAI_API_KEY not set)"),
    }

    let app = webhook_routes(AppState::from_config(&config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Voicemail webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
