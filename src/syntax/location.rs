// Byte offset -> line/column resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// A human-readable position inside a source file
///
/// `line` and `column` are 1-based; `column` counts UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Resolves byte offsets of one file to `SourceLocation`s
#[derive(Debug, Clone)]
pub struct SourceLocationConverter {
    file: String,
    line_starts: Vec<usize>,
    len: usize,
}

impl SourceLocationConverter {
    pub fn new(file: impl Into<String>, source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|(_, byte)| *byte == b'\n')
                    .map(|(index, _)| index + 1),
            )
            .collect();

        Self {
            file: file.into(),
            line_starts,
            len: source.len(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Resolve a byte offset; offsets past the end clamp to the end of file
    pub fn location(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.len);
        // line_starts[0] == 0, so an Err index is always >= 1
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };

        SourceLocation {
            file: self.file.clone(),
            line: line_index + 1,
            column: offset - self.line_starts[line_index] + 1,
            offset,
        }
    }
}
