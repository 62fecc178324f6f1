use std::sync::Arc;

use crate::config::Config;
use crate::generation::ResumePipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation, compile-repair and suggestions behind the LLM and compiler seams.
    pub pipeline: Arc<ResumePipeline>,
    pub config: Config,
}
