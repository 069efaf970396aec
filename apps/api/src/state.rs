use std::sync::Arc;

use crate::config::Config;
use crate::render::LatexEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable LaTeX engine. Default: TectonicEngine, selected via LATEX_ENGINE.
    pub engine: Arc<dyn LatexEngine>,
}
