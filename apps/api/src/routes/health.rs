use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status and which drafting path new resumes will take.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let drafting = match state.pipeline.generator().capability_name() {
        Some(model) => json!({"mode": "ai_with_template_fallback", "model": model}),
        None => json!({"mode": "template_only"}),
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "drafting": drafting,
        "one_page_char_limit": state.config.one_page_char_limit,
        "bounds": state.pipeline.policy().bounds
    }))
}
