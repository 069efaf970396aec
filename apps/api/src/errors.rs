use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::latex::GenerationError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Carries the engine's diagnostics verbatim.
    #[error("Compile failure: {0}")]
    CompileFailure(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Io(e) => {
                AppError::Internal(anyhow::Error::new(e).context("PDF rendering I/O failed"))
            }
            unavailable @ RenderError::EngineUnavailable { .. } => {
                AppError::EngineUnavailable(unavailable.to_string())
            }
            // ArtifactMissing and Timeout are compile failures from the caller's view.
            other => AppError::CompileFailure(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "GENERATION_ERROR",
                e.to_string(),
            ),
            AppError::EngineUnavailable(msg) => {
                tracing::error!("LaTeX engine unavailable: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ENGINE_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::CompileFailure(msg) => {
                tracing::warn!("LaTeX compilation failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMPILE_FAILURE",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_errors_map_to_app_errors() {
        let err: AppError = RenderError::EngineUnavailable {
            binary: "tectonic".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::EngineUnavailable(_)));

        let err: AppError = RenderError::CompileFailure {
            status: "exit status: 1".to_string(),
            diagnostics: "! Undefined control sequence.".to_string(),
        }
        .into();
        match err {
            AppError::CompileFailure(msg) => assert!(msg.contains("! Undefined control sequence.")),
            other => panic!("expected CompileFailure, got {other:?}"),
        }

        let err: AppError = RenderError::ArtifactMissing("resume.pdf".to_string()).into();
        assert!(matches!(err, AppError::CompileFailure(_)));

        let err: AppError = RenderError::Timeout { secs: 60 }.into();
        assert!(matches!(err, AppError::CompileFailure(_)));

        let err: AppError = RenderError::Io(std::io::Error::other("disk full")).into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Generation(GenerationError::MissingName),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::EngineUnavailable("gone".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::CompileFailure("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
