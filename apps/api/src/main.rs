mod config;
mod errors;
mod generation;
mod latex;
mod llm_client;
mod models;
mod parsing;
mod render;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::generation::ResumePipeline;
use crate::llm_client::LlmClient;
use crate::render::{PdfLatexCompiler, RepairPolicy};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
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

    info!("Starting ATS-Builder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    if config.llm_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("ANTHROPIC_API_KEY not set: generation falls back to the template, repairs are skipped");
    }

    // Locate the LaTeX compiler once; absence is a degraded mode, not an error
    let compiler = PdfLatexCompiler::detect(
        config.pdflatex_path.clone(),
        config.compile_timeout,
        config.max_concurrent_compiles,
    )
    .await;

    let policy = RepairPolicy {
        max_attempts: config.max_repair_attempts,
        llm_timeout: config.llm_timeout,
    };
    info!(
        max_attempts = policy.max_attempts,
        compile_timeout_secs = config.compile_timeout.as_secs(),
        "Compile-repair loop configured"
    );

    let pipeline = ResumePipeline::new(
        Arc::new(llm),
        Arc::new(compiler),
        policy,
        config.suggestion_timeout,
    );

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
