pub mod compile;
pub mod health;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/compile-pdf", post(compile::handle_compile_pdf))
        .route("/preview-latex", post(compile::handle_preview_latex))
        .route("/debug-data", post(compile::handle_debug_data))
        .with_state(state)
}

/// CORS restricted to the configured editor origins. Origins that are not
/// valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::render::fake::{FakeEngine, FakeOutcome};

    const BODY_LIMIT: usize = 1024 * 1024;

    fn test_config() -> Config {
        Config {
            port: 0,
            rust_log: "info".to_string(),
            latex_engine: "fake".to_string(),
            compile_timeout_secs: 60,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }

    fn app(engine: FakeEngine) -> Router {
        build_router(AppState {
            config: test_config(),
            engine: Arc::new(engine),
        })
    }

    fn payload(name: &str) -> Value {
        json!({
            "resumeData": {
                "layout": {
                    "margins": { "top": 20, "bottom": 20, "left": 15, "right": 15 },
                    "spacing": { "sectionSpacing": 12, "itemSpacing": 6 },
                    "fonts": { "nameSize": 24, "sectionSize": 14, "contentSize": 11 }
                },
                "sections": {
                    "personal": {
                        "name": name,
                        "email": "j@x.com",
                        "phone": "",
                        "location": "NYC",
                        "website": ""
                    },
                    "experience": [{
                        "title": "Engineer",
                        "company": "Acme",
                        "location": "Remote",
                        "startDate": "2020",
                        "endDate": "Present",
                        "bullets": ["Cut latency 40%", "Led R&D"]
                    }],
                    "education": [],
                    "skills": []
                }
            },
            "resumeTitle": "Jane Doe"
        })
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root() {
        let response = app(FakeEngine::producing(b"%PDF"))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "LaTeX Resume Compiler API");
    }

    #[tokio::test]
    async fn test_health_reports_engine_availability() {
        let response = app(FakeEngine::producing(b"%PDF"))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["engine_available"], true);
        assert_eq!(body["engine_version"], "fake 1.0");

        let response = app(FakeEngine::new(false, FakeOutcome::NoArtifact))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["engine_available"], false);
        assert!(body["engine_version"].is_null());
    }

    #[tokio::test]
    async fn test_preview_returns_latex() {
        let response = app(FakeEngine::producing(b"%PDF"))
            .oneshot(post_json("/preview-latex", &payload("Jane Doe")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let latex = body["latex"].as_str().unwrap();
        assert!(latex.contains("\\textbf{Jane Doe}"));
        assert!(latex.contains("{\\small j@x.com $|$ NYC}"));
        assert!(latex.contains("\\resumeItem{Cut latency 40\\%}"));
        assert!(latex.contains("\\resumeItem{Led R\\&D}"));
        assert!(!latex.contains("\\section{Education}"));
    }

    #[tokio::test]
    async fn test_preview_blank_name_is_generation_error() {
        let response = app(FakeEngine::producing(b"%PDF"))
            .oneshot(post_json("/preview-latex", &payload("  ")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_rejected_before_generation() {
        let engine = Arc::new(FakeEngine::producing(b"%PDF"));
        let router = build_router(AppState {
            config: test_config(),
            engine: engine.clone(),
        });

        let response = router
            .oneshot(post_json("/compile-pdf", &json!({ "resumeData": { "sections": {} } })))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compile_pdf_returns_attachment() {
        let engine = Arc::new(FakeEngine::producing(b"%PDF-1.7 resume"));
        let router = build_router(AppState {
            config: test_config(),
            engine: engine.clone(),
        });

        let response = router
            .oneshot(post_json("/compile-pdf", &payload("Jane Doe")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jane Doe.pdf\""
        );

        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.7 resume");

        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.contains("\\textbf{Jane Doe}"));
    }

    #[tokio::test]
    async fn test_compile_pdf_engine_unavailable() {
        let response = app(FakeEngine::new(false, FakeOutcome::NoArtifact))
            .oneshot(post_json("/compile-pdf", &payload("Jane Doe")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "ENGINE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_compile_pdf_surfaces_diagnostics() {
        let response = app(FakeEngine::new(
            true,
            FakeOutcome::Fail("! LaTeX Error: File `fontspec.sty' not found.".to_string()),
        ))
        .oneshot(post_json("/compile-pdf", &payload("Jane Doe")))
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "COMPILE_FAILURE");
        assert_eq!(
            body["error"]["message"],
            "LaTeX compilation failed: ! LaTeX Error: File `fontspec.sty' not found."
        );
    }

    #[tokio::test]
    async fn test_compile_pdf_missing_artifact() {
        let response = app(FakeEngine::new(true, FakeOutcome::NoArtifact))
            .oneshot(post_json("/compile-pdf", &payload("Jane Doe")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "COMPILE_FAILURE");
    }

    #[tokio::test]
    async fn test_debug_data_echoes_summary() {
        let mut body = payload("Jane Doe");
        body["resumeData"]["layout"]["fonts"]["nameSize"] = json!(500);

        let response = app(FakeEngine::producing(b"%PDF"))
            .oneshot(post_json("/debug-data", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["title"], "Jane Doe");
        assert_eq!(body["name"], "Jane Doe");
        assert_eq!(body["experience_count"], 1);
        assert_eq!(body["bullet_count"], 2);
        assert_eq!(body["education_count"], 0);
        assert_eq!(body["layout"]["fonts"]["nameSize"], 24);
        assert_eq!(body["layout"]["spacing"]["sectionSpacing"], 12);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let router = app(FakeEngine::producing(b"%PDF"))
            .layer(cors_layer(&test_config().cors_allowed_origins));

        let response = router
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/compile-pdf")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }
}
