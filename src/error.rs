//! Errors surfaced by the file aggregator
//!
//! Extraction misses and documentation misses are ordinary `Option`/`Result`
//! values consumed inside the traversal; only a failure to obtain a tree for
//! the whole file reaches callers.

use thiserror::Error;

/// A single Swift file could not be turned into a syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read (missing, unreadable or not UTF-8)
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The Swift grammar is incompatible with the linked tree-sitter runtime
    #[error("failed to load the Swift grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// tree-sitter returned no tree
    #[error("parser produced no tree for '{path}'")]
    Aborted { path: String },

    /// The tree contains error or missing nodes
    #[error("syntax error in '{path}' at {line}:{column}")]
    Syntax {
        path: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Path of the file the error belongs to, when known
    pub fn path(&self) -> Option<&str> {
        match self {
            ParseError::Io { path, .. }
            | ParseError::Aborted { path }
            | ParseError::Syntax { path, .. } => Some(path),
            ParseError::Language(_) => None,
        }
    }
}
