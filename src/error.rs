//! Error types for clipmark operations.

use thiserror::Error;

/// Errors that can occur while clipping a page.
///
/// Conversion itself never surfaces these to callers of
/// [`Transpiler::transpile`](crate::Transpiler::transpile): document-level
/// failures are turned into a diagnostic note instead. They are returned by
/// the lower-level walk, the registry loader and the CLI.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("dangling node id {0}")]
    DanglingNode(u32),

    #[error("invalid property: {0}")]
    InvalidProperty(String),
}

pub type Result<T> = std::result::Result<T, Error>;
