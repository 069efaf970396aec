//! PDF rendering — hands generated LaTeX to an external engine.
//!
//! The engine is a black box with a fixed contract: it reads
//! [`SOURCE_FILE`] from a working directory and writes [`ARTIFACT_FILE`]
//! next to it. Every request gets its own temporary directory, so
//! concurrent compiles never share filesystem state.
//!
//! `AppState` holds an `Arc<dyn LatexEngine>`; tests swap in a fake.

pub mod tectonic;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub use tectonic::TectonicEngine;

/// Fixed name of the LaTeX source written into the working directory.
pub const SOURCE_FILE: &str = "resume.tex";
/// Fixed name of the PDF the engine is expected to produce.
pub const ARTIFACT_FILE: &str = "resume.pdf";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("LaTeX engine '{binary}' is not installed or not available in PATH")]
    EngineUnavailable { binary: String },

    /// Engine ran and exited nonzero. `diagnostics` is the engine's own output.
    #[error("LaTeX compilation failed: {diagnostics}")]
    CompileFailure { status: String, diagnostics: String },

    #[error("PDF file was not generated ({0} missing after a successful run)")]
    ArtifactMissing(String),

    #[error("LaTeX compilation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// An external LaTeX engine. Implement this to swap engines without
/// touching handlers.
#[async_trait]
pub trait LatexEngine: Send + Sync {
    /// Name shown in logs and health output.
    fn name(&self) -> &str;

    /// Engine version string, or `None` when the engine cannot be run.
    async fn version(&self) -> Option<String>;

    async fn is_available(&self) -> bool {
        self.version().await.is_some()
    }

    /// Compiles `source` inside `work_dir` and returns the artifact path.
    /// `work_dir` is owned by the caller and exists for the whole call.
    async fn compile(&self, source: &str, work_dir: &Path) -> Result<PathBuf, RenderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Render pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Compiles `source` in a fresh temporary directory and returns the PDF.
///
/// The directory is removed when this returns, on success and failure
/// alike. No retries: a document that fails once fails every time.
pub async fn render_pdf(engine: &dyn LatexEngine, source: &str) -> Result<Bytes, RenderError> {
    let job_id = Uuid::new_v4();
    let work_dir = tempfile::Builder::new().prefix("notex-").tempdir()?;

    info!(
        "Render job {job_id}: compiling {} bytes of LaTeX with {} in {}",
        source.len(),
        engine.name(),
        work_dir.path().display()
    );

    let artifact = match engine.compile(source, work_dir.path()).await {
        Ok(path) => path,
        Err(e) => {
            if let RenderError::CompileFailure { status, .. } = &e {
                warn!("Render job {job_id}: {} exited with {status}", engine.name());
            }
            warn!("Render job {job_id} failed: {e}");
            return Err(e);
        }
    };

    let pdf = match tokio::fs::read(&artifact).await {
        Ok(pdf) => pdf,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Render job {job_id}: artifact vanished at {}", artifact.display());
            return Err(RenderError::ArtifactMissing(ARTIFACT_FILE.to_string()));
        }
        Err(e) => return Err(RenderError::Io(e)),
    };

    info!("Render job {job_id}: produced {} byte PDF", pdf.len());
    Ok(Bytes::from(pdf))
}

// ────────────────────────────────────────────────────────────────────────────
// Test double
// ────────────────────────────────────────────────────────────────────────────


// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
