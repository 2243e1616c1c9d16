//! AI tutor HTTP server binary.
//!
//! Starts an axum HTTP server that answers tutoring questions through an
//! OpenRouter-compatible chat-completion API.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` - Upstream API key (required)
//! - `TUTOR_BASE_URL` - Upstream base URL (default: https://openrouter.ai/api/v1)
//! - `TUTOR_PRIMARY_MODEL` / `TUTOR_SECONDARY_MODEL` - Model ids, tried in order
//! - `TUTOR_REFERER` / `TUTOR_APP_TITLE` - Attribution headers
//! - `TUTOR_TIMEOUT_SECS` - Optional upstream request timeout
//! - `TUTOR_KNOWLEDGE_FILE` - Optional file replacing the built-in knowledge text
//! - `HOST` / `PORT` - Listen host name or IP and port (default: 0.0.0.0:8000)
//! - `RUST_LOG` - Tracing filter (default: "info,ai_tutor=debug")
//!
//! A `.env` file in the working directory is loaded first, if present.
//!
//! # Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-or-... cargo run --bin server
//! ```

use anyhow::Context;

use ai_tutor::gateway::CompletionGateway;
use ai_tutor::knowledge::Knowledge;
use ai_tutor::server::{app_router, AppState};
use ai_tutor::utilities::config::TutorConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine in production
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ai_tutor=debug".into()),
        )
        .init();

    let config = TutorConfig::from_env().context("Invalid configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let knowledge = Knowledge::load(config.knowledge_file.as_deref())?;
    let gateway = CompletionGateway::from_config(&config, knowledge)
        .context("Failed to build HTTP client")?;

    let app = app_router(AppState::new(gateway));
    let (host, port) = config.listen_target();

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    tracing::info!("AI tutor server starting on {}", listener.local_addr()?);
    tracing::info!(
        primary = %config.primary_model,
        secondary = %config.secondary_model,
        base_url = %config.base_url,
        "Completion models"
    );
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /           - service banner");
    tracing::info!("  GET    /health     - liveness check");
    tracing::info!("  POST   /query      - answer a question");
    tracing::info!("  POST   /chat       - answer a chat message");
    tracing::info!("  DELETE /chat/clear - acknowledge history reset");

    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
