//! Tectonic (or any CLI-compatible engine) invoked as a subprocess.
//!
//! Invocation: `<binary> --outdir <work_dir> resume.tex`, run with
//! `work_dir` as the current directory, under a hard timeout. The child is
//! killed if the timeout fires.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::render::{LatexEngine, RenderError, ARTIFACT_FILE, SOURCE_FILE};

/// Upper bound for `--version` probes used by health checks.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum characters of engine output written to the log. The error
/// returned to the caller always carries the full text.
const MAX_LOGGED_DIAGNOSTIC_CHARS: usize = 2_000;

#[derive(Debug, Clone)]
pub struct TectonicEngine {
    binary: String,
    timeout: Duration,
}

impl TectonicEngine {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    fn unavailable(&self) -> RenderError {
        RenderError::EngineUnavailable {
            binary: self.binary.clone(),
        }
    }
}

#[async_trait]
impl LatexEngine for TectonicEngine {
    fn name(&self) -> &str {
        &self.binary
    }

    async fn version(&self) -> Option<String> {
        let probe = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(VERSION_PROBE_TIMEOUT, probe).await {
            Ok(Ok(output)) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Some(if version.is_empty() {
                    self.binary.clone()
                } else {
                    version
                })
            }
            Ok(Ok(output)) => {
                warn!(
                    "'{} --version' exited with {}",
                    self.binary, output.status
                );
                None
            }
            Ok(Err(e)) => {
                debug!("LaTeX engine '{}' cannot be spawned: {e}", self.binary);
                None
            }
            Err(_) => {
                warn!(
                    "'{} --version' did not answer within {}s",
                    self.binary,
                    VERSION_PROBE_TIMEOUT.as_secs()
                );
                None
            }
        }
    }

    async fn compile(&self, source: &str, work_dir: &Path) -> Result<PathBuf, RenderError> {
        tokio::fs::write(work_dir.join(SOURCE_FILE), source).await?;

        let run = Command::new(&self.binary)
            .arg("--outdir")
            .arg(work_dir)
            .arg(SOURCE_FILE)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, run).await {
            Err(_) => {
                return Err(RenderError::Timeout {
                    secs: self.timeout.as_secs(),
                })
            }
            Ok(Err(e)) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                return Err(self.unavailable())
            }
            Ok(Err(e)) => return Err(RenderError::Io(e)),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let diagnostics = diagnostics(&output);
            warn!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                log_excerpt(&diagnostics, MAX_LOGGED_DIAGNOSTIC_CHARS)
            );
            return Err(RenderError::CompileFailure {
                status: output.status.to_string(),
                diagnostics,
            });
        }

        let pdf_path = work_dir.join(ARTIFACT_FILE);
        if !tokio::fs::try_exists(&pdf_path).await? {
            return Err(RenderError::ArtifactMissing(ARTIFACT_FILE.to_string()));
        }

        info!("{} finished: {}", self.binary, output.status);
        Ok(pdf_path)
    }
}

/// The engine's own account of what went wrong: stderr, or stdout when
/// stderr is empty (some engines log errors to stdout).
fn diagnostics(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout)
    } else {
        stderr
    };

    let text = text.trim();
    if text.is_empty() {
        return format!("engine exited with {} and no output", output.status);
    }
    text.to_string()
}

/// Last `max_chars` characters of `text`, prefixed with `…` when cut.
/// TeX engines report the fatal error at the end of their output.
fn log_excerpt(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }
    let tail: String = text.chars().skip(total - max_chars).collect();
    format!("…{tail}")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
