// Swift declaration extraction
//
// Each extractor tries to reinterpret one syntax node as a typed declaration.
// A node that lacks the required shape is "not this kind": extractors return
// `None` (or an empty `Vec` for multi-binding kinds) and never log or panic.
// Organized into focused modules, one per declaration family.

pub mod callables;
pub mod enum_cases;
pub mod extensions;
pub mod model;
pub mod operators;
pub mod properties;
pub mod protocol;
pub mod signatures;
pub mod types;

use serde::{Deserialize, Serialize};
use std::fmt;
use tree_sitter::Node;

use crate::syntax::node_text;

pub use model::*;

/// Tag identifying which kind of declaration a `Declaration` holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Structure,
    Enumeration,
    EnumerationCase,
    Protocol,
    Function,
    Initializer,
    Subscript,
    Variable,
    Typealias,
    AssociatedType,
    PrecedenceGroup,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Structure => "structure",
            DeclarationKind::Enumeration => "enumeration",
            DeclarationKind::EnumerationCase => "enumeration_case",
            DeclarationKind::Protocol => "protocol",
            DeclarationKind::Function => "function",
            DeclarationKind::Initializer => "initializer",
            DeclarationKind::Subscript => "subscript",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Typealias => "typealias",
            DeclarationKind::AssociatedType => "associated_type",
            DeclarationKind::PrecedenceGroup => "precedence_group",
        }
    }

    /// Kinds whose members are visited with the declaration pushed as context
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Class
                | DeclarationKind::Structure
                | DeclarationKind::Enumeration
                | DeclarationKind::Protocol
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented declaration, one variant per kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Class(Class),
    Structure(Structure),
    Enumeration(Enumeration),
    EnumerationCase(EnumerationCase),
    Protocol(Protocol),
    Function(Function),
    Initializer(Initializer),
    Subscript(Subscript),
    Variable(Variable),
    Typealias(Typealias),
    AssociatedType(AssociatedType),
    PrecedenceGroup(PrecedenceGroup),
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Declaration::Class(_) => DeclarationKind::Class,
            Declaration::Structure(_) => DeclarationKind::Structure,
            Declaration::Enumeration(_) => DeclarationKind::Enumeration,
            Declaration::EnumerationCase(_) => DeclarationKind::EnumerationCase,
            Declaration::Protocol(_) => DeclarationKind::Protocol,
            Declaration::Function(_) => DeclarationKind::Function,
            Declaration::Initializer(_) => DeclarationKind::Initializer,
            Declaration::Subscript(_) => DeclarationKind::Subscript,
            Declaration::Variable(_) => DeclarationKind::Variable,
            Declaration::Typealias(_) => DeclarationKind::Typealias,
            Declaration::AssociatedType(_) => DeclarationKind::AssociatedType,
            Declaration::PrecedenceGroup(_) => DeclarationKind::PrecedenceGroup,
        }
    }

    /// Declared name; initializers and subscripts use their keyword
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(d) => &d.name,
            Declaration::Structure(d) => &d.name,
            Declaration::Enumeration(d) => &d.name,
            Declaration::EnumerationCase(d) => &d.name,
            Declaration::Protocol(d) => &d.name,
            Declaration::Function(d) => &d.name,
            Declaration::Initializer(d) => &d.keyword,
            Declaration::Subscript(d) => &d.keyword,
            Declaration::Variable(d) => &d.name,
            Declaration::Typealias(d) => &d.name,
            Declaration::AssociatedType(d) => &d.name,
            Declaration::PrecedenceGroup(d) => &d.name,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Declaration::Class(d) => &d.attributes,
            Declaration::Structure(d) => &d.attributes,
            Declaration::Enumeration(d) => &d.attributes,
            Declaration::EnumerationCase(d) => &d.attributes,
            Declaration::Protocol(d) => &d.attributes,
            Declaration::Function(d) => &d.attributes,
            Declaration::Initializer(d) => &d.attributes,
            Declaration::Subscript(d) => &d.attributes,
            Declaration::Variable(d) => &d.attributes,
            Declaration::Typealias(d) => &d.attributes,
            Declaration::AssociatedType(d) => &d.attributes,
            Declaration::PrecedenceGroup(d) => &d.attributes,
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Declaration::Class(d) => &d.modifiers,
            Declaration::Structure(d) => &d.modifiers,
            Declaration::Enumeration(d) => &d.modifiers,
            Declaration::EnumerationCase(d) => &d.modifiers,
            Declaration::Protocol(d) => &d.modifiers,
            Declaration::Function(d) => &d.modifiers,
            Declaration::Initializer(d) => &d.modifiers,
            Declaration::Subscript(d) => &d.modifiers,
            Declaration::Variable(d) => &d.modifiers,
            Declaration::Typealias(d) => &d.modifiers,
            Declaration::AssociatedType(d) => &d.modifiers,
            Declaration::PrecedenceGroup(d) => &d.modifiers,
        }
    }

    /// Generic parameters of kinds that can declare them
    pub fn generic_parameters(&self) -> &[GenericParameter] {
        match self {
            Declaration::Class(d) => &d.generic_parameters,
            Declaration::Structure(d) => &d.generic_parameters,
            Declaration::Enumeration(d) => &d.generic_parameters,
            Declaration::Function(d) => &d.generic_parameters,
            Declaration::Initializer(d) => &d.generic_parameters,
            Declaration::Subscript(d) => &d.generic_parameters,
            Declaration::Typealias(d) => &d.generic_parameters,
            Declaration::EnumerationCase(_)
            | Declaration::Protocol(_)
            | Declaration::Variable(_)
            | Declaration::AssociatedType(_)
            | Declaration::PrecedenceGroup(_) => &[],
        }
    }

    /// Explicit access level (`public`, `open`, `internal`, `fileprivate`, `private`)
    pub fn access_level(&self) -> Option<&str> {
        access_level(self.modifiers())
    }

    /// Declaration rendered back to a single-line Swift signature
    pub fn signature(&self) -> String {
        signatures::render(self)
    }
}

const ACCESS_LEVELS: &[&str] = &["open", "public", "package", "internal", "fileprivate", "private"];

/// First access-level modifier that applies to the declaration itself;
/// `private(set)` only restricts the setter and is skipped
pub(crate) fn access_level(modifiers: &[Modifier]) -> Option<&str> {
    modifiers
        .iter()
        .find(|m| m.detail.is_none() && ACCESS_LEVELS.contains(&m.name.as_str()))
        .map(|m| m.name.as_str())
}

/// Pure, per-file extractor; every method reads only the node it is given
#[derive(Debug, Clone, Copy)]
pub struct DeclarationExtractor<'a> {
    source: &'a str,
}

impl<'a> DeclarationExtractor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub(crate) fn text(&self, node: &Node) -> String {
        node_text(node, self.source)
    }

    /// Text with runs of whitespace (including newlines) collapsed to one space
    pub(crate) fn compact_text(&self, node: &Node) -> String {
        self.text(node).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Keyword that introduces a nominal declaration
    /// (`class`, `struct`, `actor`, `enum`, `extension`, `protocol`)
    pub fn declaration_keyword(&self, node: &Node) -> Option<String> {
        if let Some(keyword) = node.child_by_field_name("declaration_kind") {
            return Some(self.text(&keyword));
        }
        // Fall back to the first keyword token among the direct children
        let mut cursor = node.walk();
        let found = node.children(&mut cursor).find(|c| {
            matches!(
                c.kind(),
                "class" | "struct" | "actor" | "enum" | "extension" | "protocol"
            )
        });
        found.map(|c| c.kind().to_string())
    }
}

pub(crate) fn child_of_kind<'t>(node: &Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| kinds.contains(&c.kind()));
    found
}

pub(crate) fn children_of_kind<'t>(node: &Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| kinds.contains(&c.kind()))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use tree_sitter::{Node, Tree};

    use crate::config::ParserConfig;
    use crate::language::parse_source;

    pub fn parse(source: &str) -> Tree {
        parse_source(source, "Test.swift", &ParserConfig::default()).expect("test source parses")
    }

    /// First node of `kind` in pre-order
    pub fn find_node<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        children.into_iter().find_map(|child| find_node(child, kind))
    }
}
