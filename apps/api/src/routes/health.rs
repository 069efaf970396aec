use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "LaTeX Resume Compiler API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health
/// Always 200; reports whether the LaTeX engine can be run.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let engine_version = state.engine.version().await;

    Json(json!({
        "status": "healthy",
        "service": "notex-api",
        "version": env!("CARGO_PKG_VERSION"),
        "engine": state.engine.name(),
        "engine_available": engine_version.is_some(),
        "engine_version": engine_version,
        "compile_timeout_secs": state.config.compile_timeout_secs,
    }))
}
