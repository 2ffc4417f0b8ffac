//! Language Support - tree-sitter configuration for Swift
//!
//! This module is the single place where the Swift grammar is loaded and
//! source text is turned into a `tree_sitter::Tree`.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::config::ParserConfig;
use crate::error::ParseError;

/// File extensions recognized as Swift sources
pub const SWIFT_EXTENSIONS: &[&str] = &["swift"];

/// Get the tree-sitter language for Swift
pub fn swift_language() -> tree_sitter::Language {
    tree_sitter_swift::LANGUAGE.into()
}

/// Create a parser configured for Swift
pub fn new_parser() -> Result<Parser, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&swift_language())?;
    Ok(parser)
}

/// Parse Swift source text
///
/// `path` is only used for error reporting. Unless
/// `config.allow_syntax_errors` is set, a tree containing error or missing
/// nodes is rejected with the position of the first offending node.
pub fn parse_source(source: &str, path: &str, config: &ParserConfig) -> Result<Tree, ParseError> {
    let mut parser = new_parser()?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Aborted {
            path: path.to_string(),
        })?;

    if !config.allow_syntax_errors {
        if let Some(error_node) = first_error(tree.root_node()) {
            let position = error_node.start_position();
            return Err(ParseError::Syntax {
                path: path.to_string(),
                line: position.row + 1,
                column: position.column + 1,
            });
        }
    }

    Ok(tree)
}

/// Detect whether a path names a Swift source file
pub fn is_swift_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SWIFT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Find the first error or missing node in document order
fn first_error(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);

    // has_error() was true, so fall back to the node itself
    found.or(Some(node))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_source() {
        let tree = parse_source("struct Point { var x: Int }", "Point.swift", &ParserConfig::default())
            .expect("valid source should parse");
        assert_eq!(tree.root_node().kind(), "source_file");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_syntax_error_rejected_by_default() {
        let result = parse_source("struct {{{ ]]", "Broken.swift", &ParserConfig::default());
        match result {
            Err(ParseError::Syntax { path, line, .. }) => {
                assert_eq!(path, "Broken.swift");
                assert_eq!(line, 1);
            }
            other => panic!("expected syntax error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_syntax_error_tolerated_when_lenient() {
        let result = parse_source("struct {{{ ]]", "Broken.swift", &ParserConfig::lenient());
        assert!(result.is_ok(), "lenient parsing should keep the recovered tree");
    }

    #[test]
    fn test_is_swift_file() {
        assert!(is_swift_file(Path::new("Sources/App/main.swift")));
        assert!(!is_swift_file(Path::new("Package.resolved")));
        assert!(!is_swift_file(Path::new("README")));
    }
}
