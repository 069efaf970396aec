//! Axum route handlers for PDF compilation and LaTeX preview.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::latex::generate;
use crate::models::resume::{CompileRequest, Layout};
use crate::render::render_pdf;
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 200;
const FALLBACK_TITLE: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub latex: String,
}

/// What the server understood from a payload, for the editor's debug panel.
#[derive(Debug, Serialize)]
pub struct DebugDataResponse {
    pub title: String,
    pub name: String,
    pub experience_count: usize,
    pub bullet_count: usize,
    pub education_count: usize,
    pub skills_count: usize,
    pub layout: Layout,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /compile-pdf
///
/// Generates LaTeX from the payload, compiles it in an isolated directory and
/// streams the PDF back as an attachment named after `resumeTitle`.
pub async fn handle_compile_pdf(
    State(state): State<AppState>,
    Json(request): Json<CompileRequest>,
) -> Result<Response, AppError> {
    let filename = attachment_filename(&request.resume_title)?;

    if !state.engine.is_available().await {
        return Err(AppError::EngineUnavailable(format!(
            "LaTeX engine '{}' is not installed or not available in PATH",
            state.engine.name()
        )));
    }

    let latex = generate(&request.resume_data)?;
    let pdf = render_pdf(state.engine.as_ref(), &latex).await?;

    info!("Compiled '{filename}' ({} bytes)", pdf.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        pdf,
    )
        .into_response())
}

/// POST /preview-latex
///
/// Returns the generated LaTeX source without compiling it.
pub async fn handle_preview_latex(
    Json(request): Json<CompileRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let latex = generate(&request.resume_data)?;
    Ok(Json(PreviewResponse { latex }))
}

/// POST /debug-data
pub async fn handle_debug_data(Json(request): Json<CompileRequest>) -> Json<DebugDataResponse> {
    let sections = &request.resume_data.sections;

    Json(DebugDataResponse {
        title: request.resume_title.clone(),
        name: sections.personal.name.clone(),
        experience_count: sections.experience.len(),
        bullet_count: sections.experience.iter().map(|e| e.bullets.len()).sum(),
        education_count: sections.education.len(),
        skills_count: sections.skills.len(),
        layout: request.resume_data.layout,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Filename helpers
// ────────────────────────────────────────────────────────────────────────────

/// Turns a résumé title into a safe `.pdf` filename. Quotes, path
/// separators and control characters are dropped; a blank title becomes
/// `resume.pdf`.
fn attachment_filename(title: &str) -> Result<String, AppError> {
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "resumeTitle cannot exceed {MAX_TITLE_CHARS} characters"
        )));
    }

    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '/') && !c.is_control())
        .collect();
    let stem = match cleaned.trim() {
        "" => FALLBACK_TITLE,
        stem => stem,
    };

    Ok(format!("{stem}.pdf"))
}

/// `attachment; filename="…"`, plus an RFC 5987 `filename*` when the name
/// is not plain ASCII.
fn content_disposition(filename: &str) -> String {
    if filename.is_ascii() {
        return format!("attachment; filename=\"{filename}\"");
    }

    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
        percent_encode(filename)
    )
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
