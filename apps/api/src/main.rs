mod config;
mod errors;
mod extraction;
mod extractors;
mod feedback;
mod jobs;
mod library;
mod llm_client;
mod ooxml;
mod render;
mod routes;
mod state;
mod tailoring;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::convert::PdfConverter;
use crate::render::Renderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", config.openai_model);

    // Template and output directory
    if !config.template_path.exists() {
        warn!(
            "Template {} not found; document generation will fail until it is provided",
            config.template_path.display()
        );
    }
    tokio::fs::create_dir_all(&config.output_dir).await?;
    let renderer = Renderer::new(
        config.template_path.clone(),
        config.output_dir.clone(),
        PdfConverter::new(config.pdf_converter.clone()),
    );
    info!(
        "Writing documents to {} (default format: {:?})",
        config.output_dir.display(),
        config.default_output_format
    );

    let state = AppState {
        llm: Arc::new(llm),
        renderer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
