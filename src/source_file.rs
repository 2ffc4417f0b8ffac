// File Aggregator
//
// Reads one Swift file, parses it and runs a single traversal over the tree.
// Nothing is cached: every call builds a fresh tree and a fresh visitor.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ParserConfig;
use crate::declarations::Import;
use crate::documentation::{DocumentationParser, MarkupParser};
use crate::error::ParseError;
use crate::language::parse_source;
use crate::symbol::Symbol;
use crate::utils::paths::display_path;
use crate::visitor::Visitor;

/// Documented symbols and imports of one Swift file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    path: String,
    imports: Vec<Import>,
    symbols: Vec<Symbol>,
}

impl SourceFile {
    /// Parse `file` with the default configuration and Swift Markup
    ///
    /// The recorded path is relative to `base_directory` when the file lives
    /// beneath it.
    pub fn build(file: &Path, base_directory: &Path) -> Result<Self, ParseError> {
        Self::build_with(
            file,
            base_directory,
            &ParserConfig::default(),
            &MarkupParser,
        )
    }

    pub fn build_with(
        file: &Path,
        base_directory: &Path,
        config: &ParserConfig,
        documentation_parser: &dyn DocumentationParser,
    ) -> Result<Self, ParseError> {
        let path = display_path(file, base_directory);
        let source = std::fs::read_to_string(file).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;

        Self::parse_str(&path, &source, config, documentation_parser)
    }

    /// Index in-memory source text recorded under `path`
    pub fn parse_str(
        path: &str,
        source: &str,
        config: &ParserConfig,
        documentation_parser: &dyn DocumentationParser,
    ) -> Result<Self, ParseError> {
        let tree = parse_source(source, path, config)?;
        let (symbols, imports) = Visitor::new(path, source, documentation_parser).walk(&tree);

        debug!(
            "📄 {}: {} documented symbols, {} imports",
            path,
            symbols.len(),
            imports.len()
        );

        Ok(Self {
            path: path.to_string(),
            imports,
            symbols,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Documented symbols in document order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Every import, documented or not, in document order
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
