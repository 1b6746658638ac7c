use std::sync::Arc;

use crate::config::Config;
use crate::resume::pipeline::ResumePipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup from `config.policy`; handlers derive per-request
    /// copies when a request overrides the selection bounds.
    pub pipeline: Arc<ResumePipeline>,
}
