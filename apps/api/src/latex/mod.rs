// Document generation: résumé data → LaTeX source.
// Pure and synchronous; handlers call it inline before handing the source
// to the render engine.

pub mod document;
pub mod escape;

use thiserror::Error;

pub use document::generate;

/// The only hard failure of the generator. Everything else degrades to
/// defaults or omission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("personal.name is required and cannot be blank")]
    MissingName,
}
