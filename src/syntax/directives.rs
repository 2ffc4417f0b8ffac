// Compilation directives (`#if`, `#elseif`, `#else`, `#endif`)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?P<keyword>if|elseif|else|endif|sourceLocation)\b(?P<rest>.*)$").unwrap()
});

/// A parsed directive line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    If(String),
    ElseIf(String),
    Else,
    EndIf,
    /// `#sourceLocation` and anything else that does not open or close a block
    Other,
}

impl Directive {
    /// Parse the text of a `directive` node, returning `None` for text that
    /// is not a directive at all
    pub fn parse(text: &str) -> Option<Self> {
        let line = text.trim();
        let captures = DIRECTIVE_RE.captures(line)?;
        let condition = strip_trailing_comment(&captures["rest"]);

        Some(match &captures["keyword"] {
            "if" => Directive::If(condition),
            "elseif" => Directive::ElseIf(condition),
            "else" => Directive::Else,
            "endif" => Directive::EndIf,
            _ => Directive::Other,
        })
    }
}

/// One arm of a conditional-compilation block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "keyword", content = "condition", rename_all = "lowercase")]
pub enum Branch {
    If(String),
    ElseIf(String),
    Else,
}

impl Branch {
    /// The guard expression, `None` for `#else`
    pub fn condition(&self) -> Option<&str> {
        match self {
            Branch::If(condition) | Branch::ElseIf(condition) => Some(condition),
            Branch::Else => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Branch::If(_) => "#if",
            Branch::ElseIf(_) => "#elseif",
            Branch::Else => "#else",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.condition() {
            Some(condition) => write!(f, "{} {}", self.keyword(), condition),
            None => write!(f, "{}", self.keyword()),
        }
    }
}

fn strip_trailing_comment(rest: &str) -> String {
    let without_comment = match rest.find("//") {
        Some(index) => &rest[..index],
        None => rest,
    };
    without_comment.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_if_with_condition() {
        assert_eq!(
            Directive::parse("#if os(iOS) && !targetEnvironment(macCatalyst)"),
            Some(Directive::If(
                "os(iOS) && !targetEnvironment(macCatalyst)".to_string()
            ))
        );
    }

    #[test]
    fn test_elseif_is_not_mistaken_for_else() {
        assert_eq!(
            Directive::parse("#elseif canImport(UIKit)"),
            Some(Directive::ElseIf("canImport(UIKit)".to_string()))
        );
        assert_eq!(Directive::parse("  #else  "), Some(Directive::Else));
        assert_eq!(Directive::parse("#endif"), Some(Directive::EndIf));
    }

    #[test]
    fn test_trailing_comment_removed_from_condition() {
        assert_eq!(
            Directive::parse("#if DEBUG // only in development"),
            Some(Directive::If("DEBUG".to_string()))
        );
    }

    #[test]
    fn test_non_block_directives() {
        assert_eq!(
            Directive::parse("#sourceLocation(file: \"a.swift\", line: 1)"),
            Some(Directive::Other)
        );
        assert_eq!(Directive::parse("#ifdef"), None);
        assert_eq!(Directive::parse("let x = 1"), None);
    }

    #[test]
    fn test_branch_serialization_shape() {
        let json = serde_json::to_value(Branch::ElseIf("B".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"keyword": "elseif", "condition": "B"}));

        let json = serde_json::to_value(Branch::Else).unwrap();
        assert_eq!(json, serde_json::json!({"keyword": "else"}));
    }

    #[test]
    fn test_branch_display() {
        assert_eq!(Branch::If("A".to_string()).to_string(), "#if A");
        assert_eq!(Branch::Else.to_string(), "#else");
    }
}
