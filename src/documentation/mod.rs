//! Documentation comments
//!
//! A declaration only becomes a symbol when the comment attached to it parses
//! as documentation. Parsing sits behind [`DocumentationParser`] so callers
//! can substitute their own markup dialect; [`MarkupParser`] understands the
//! Swift Markup conventions used by Xcode and DocC.

pub mod markup;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use markup::MarkupParser;

/// Structured contents of a documentation comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Documentation {
    /// First paragraph
    pub summary: Option<String>,
    /// Remaining paragraphs and code blocks, in order
    pub discussion: Vec<String>,
    pub parameters: Vec<ParameterDoc>,
    pub returns: Option<String>,
    pub throws: Option<String>,
    pub callouts: Vec<Callout>,
}

impl Documentation {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.discussion.is_empty()
            && self.parameters.is_empty()
            && self.returns.is_none()
            && self.throws.is_none()
            && self.callouts.is_empty()
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDoc> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }
}

/// `- Parameter name: description`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDoc {
    pub name: String,
    pub description: String,
}

/// `- Note: content`, `- Warning: content`, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Callout {
    pub delimiter: String,
    pub content: String,
}

/// Why a comment could not be read as documentation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentationError {
    #[error("comment does not use documentation syntax")]
    NotDocumentation,

    #[error("documentation comment has no content")]
    Empty,
}

/// Turns the raw text of a leading comment into `Documentation`
pub trait DocumentationParser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Documentation, DocumentationError>;
}
