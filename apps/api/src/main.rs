mod config;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resume::drafter::{DraftCapability, DraftGenerator};
use crate::resume::pipeline::ResumePipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; invalid numbers or bounds abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting placement resume API v{}", env!("CARGO_PKG_VERSION"));

    // Drafting capability: absent key means every resume uses the template
    let generator = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone()).context("Failed to build LLM HTTP client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            let capability: Arc<dyn DraftCapability> = Arc::new(llm);
            DraftGenerator::new(Some(capability), config.generation_timeout)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; resumes will use the template fallback");
            DraftGenerator::template_only()
        }
    };

    let pipeline = ResumePipeline::new(config.policy, generator, config.one_page_char_limit);
    info!(
        max_projects = config.policy.bounds.max_projects,
        max_internships = config.policy.bounds.max_internships,
        max_skills = config.policy.bounds.max_languages,
        one_page_char_limit = config.one_page_char_limit,
        timeout_secs = config.generation_timeout.as_secs(),
        "Resume pipeline configured"
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
