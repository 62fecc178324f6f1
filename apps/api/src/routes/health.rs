use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::render::compiler::INSTALL_INSTRUCTIONS;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ats-builder-api"
    }))
}

/// GET /api/v1/status
/// Reports which collaborators are usable: compiler binary + version and
/// whether an LLM key is configured. Install steps are included while no
/// compiler is available.
pub async fn status_handler(State(state): State<AppState>) -> Json<Value> {
    let status = state.pipeline.status();
    Json(json!({
        "status": "ok",
        "pdf_generation": status.compiler.available,
        "compiler": status.compiler,
        "llm_configured": status.llm_configured,
        "max_repair_attempts": status.max_repair_attempts,
        "max_upload_bytes": state.config.max_upload_bytes,
        "install_instructions": (!status.compiler.available).then_some(INSTALL_INSTRUCTIONS),
    }))
}
