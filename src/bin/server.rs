//! Dialogos HTTP server binary.
//!
//! # Environment Variables
//!
//! - `GROQ_API_KEY`: Generation API key (required)
//! - `GROQ_BASE_URL` / `GROQ_MODEL`: Generation endpoint and model
//! - `PORT`: HTTP port (default: 8080)
//! - `RUST_LOG`: Tracing filter (default: "info,dialogos=debug")
//!
//! # Usage
//!
//! ```bash
//! GROQ_API_KEY=... cargo run --bin server
//! ```

use std::sync::Arc;

use anyhow::Context;
use dialogos::chat::{ChatPipeline, PipelineSettings};
use dialogos::llms::GroqCompletion;
use dialogos::memory::InMemoryStore;
use dialogos::server::{app_router, AppState};
use dialogos::telemetry::TracingSink;
use dialogos::DialogosConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dialogos=debug".into()),
        )
        .init();

    let config = DialogosConfig::from_env().context("invalid configuration")?;
    let bind_addr = format!("0.0.0.0:{}", config.port);

    let generator =
        GroqCompletion::from_config(&config).context("failed to build generation client")?;
    tracing::info!(model = %config.groq_model, "generation client ready");

    let pipeline = ChatPipeline::new(
        Arc::new(generator),
        Arc::new(InMemoryStore::new()),
        Arc::new(TracingSink),
    )
    .with_settings(PipelineSettings::from_config(&config));

    let app = app_router(AppState::new(pipeline));

    tracing::info!("dialogos server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health              - liveness probe");
    tracing::info!("  POST /chat                - conversational turn");
    tracing::info!("  POST /analyze             - message analysis");
    tracing::info!("  GET  /resources/:category - emergency resources");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
