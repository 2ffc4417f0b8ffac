// Leading documentation comment lookup
//
// tree-sitter-swift reports comments as `comment` / `multiline_comment`
// extras. Leading comments of a declaration end up as its previous siblings,
// so the lookup walks backwards over adjacent comment siblings.

use tree_sitter::Node;

use super::node_text;

const COMMENT_KINDS: &[&str] = &["comment", "multiline_comment"];

/// Check whether raw comment text uses documentation syntax (`///` or `/** */`)
pub fn is_doc_comment(text: &str) -> bool {
    let trimmed = text.trim_start();
    if trimmed.starts_with("////") || trimmed.starts_with("/**/") {
        return false;
    }
    trimmed.starts_with("///") || trimmed.starts_with("/**")
}

/// Find the raw documentation comment attached to a declaration node
///
/// Collects the run of documentation comments immediately above the node,
/// top to bottom, joined with newlines. The run stops at a blank line, at any
/// non-comment sibling and at an ordinary comment.
pub fn leading_doc_comment(node: &Node, source: &str) -> Option<String> {
    let mut comments = Vec::new();
    let mut boundary_row = node.start_position().row;

    let mut current = node.prev_sibling();
    while let Some(sibling) = current {
        if !COMMENT_KINDS.contains(&sibling.kind()) {
            break;
        }
        // A blank line detaches the comment from whatever follows it
        if sibling.end_position().row + 1 < boundary_row {
            break;
        }

        // A comment trailing other code on its line belongs to that code
        if !starts_line(&sibling, source) {
            break;
        }

        let comment_text = node_text(&sibling, source);
        if !is_doc_comment(&comment_text) {
            break;
        }

        comments.push(comment_text);
        boundary_row = sibling.start_position().row;
        current = sibling.prev_sibling();
    }

    if comments.is_empty() {
        None
    } else {
        // Reverse to get original order (top to bottom)
        comments.reverse();
        Some(comments.join("\n"))
    }
}

/// Whether only whitespace precedes `node` on its first line
fn starts_line(node: &Node, source: &str) -> bool {
    let Some(before) = source.get(..node.start_byte()) else {
        return false;
    };
    let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
    before[line_start..].trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::language::parse_source;

    fn first_declaration_comment(source: &str, kind: &str) -> Option<String> {
        let tree = parse_source(source, "Test.swift", &ParserConfig::default()).unwrap();
        let root = tree.root_node();
        let mut cursor = root.walk();
        let node = root
            .children(&mut cursor)
            .find(|child| child.kind() == kind)
            .expect("declaration present");
        leading_doc_comment(&node, source)
    }

    #[test]
    fn test_is_doc_comment() {
        assert!(is_doc_comment("/// Summary"));
        assert!(is_doc_comment("/** Summary */"));
        assert!(!is_doc_comment("// plain"));
        assert!(!is_doc_comment("/* plain */"));
        assert!(!is_doc_comment("//// banner"));
        assert!(!is_doc_comment("/**/"));
    }

    #[test]
    fn test_line_comment_run_is_collected_in_order() {
        let source = "/// First line.\n/// Second line.\nfunc f() {}\n";
        let comment = first_declaration_comment(source, "function_declaration");
        assert_eq!(
            comment.as_deref(),
            Some("/// First line.\n/// Second line.")
        );
    }

    #[test]
    fn test_block_comment_is_collected() {
        let source = "/**\n Adds numbers.\n */\nfunc add() {}\n";
        let comment = first_declaration_comment(source, "function_declaration");
        assert_eq!(comment.as_deref(), Some("/**\n Adds numbers.\n */"));
    }

    #[test]
    fn test_plain_comment_is_not_documentation() {
        let source = "// Just a note.\nfunc f() {}\n";
        assert_eq!(first_declaration_comment(source, "function_declaration"), None);
    }

    #[test]
    fn test_blank_line_detaches_comment() {
        let source = "/// Orphaned.\n\nfunc f() {}\n";
        assert_eq!(first_declaration_comment(source, "function_declaration"), None);
    }

    #[test]
    fn test_trailing_comment_stays_with_its_line() {
        let source = "let a = 1 /// note\nfunc f() {}\n";
        assert_eq!(first_declaration_comment(source, "function_declaration"), None);

        let source = "let a = 1 /// note\n/// Attached.\nfunc f() {}\n";
        assert_eq!(
            first_declaration_comment(source, "function_declaration").as_deref(),
            Some("/// Attached.")
        );
    }

    #[test]
    fn test_plain_comment_stops_the_run() {
        let source = "/// Not attached.\n// MARK: - Section\n/// Attached.\nfunc f() {}\n";
        assert_eq!(
            first_declaration_comment(source, "function_declaration").as_deref(),
            Some("/// Attached.")
        );
    }
}
