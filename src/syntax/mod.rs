//! Syntax layer over tree-sitter-swift
//!
//! The Swift grammar reports `#if` / `#elseif` / `#else` / `#endif` as flat
//! `directive` extras sitting between ordinary siblings. [`elements`]
//! regroups a node's children so that every conditional-compilation block
//! becomes an [`IfConfigBlock`] holding one [`IfConfigClause`] per branch,
//! with nested blocks nested. Everything above this module sees a tree in
//! which compilation branches are structural.

pub mod comments;
pub mod directives;
pub mod location;

use std::mem;

use tracing::warn;
use tree_sitter::Node;

pub use comments::{is_doc_comment, leading_doc_comment};
pub use directives::{Branch, Directive};
pub use location::{SourceLocation, SourceLocationConverter};

/// A child in the lowered tree
#[derive(Debug, Clone)]
pub enum Element<'tree> {
    Node(Node<'tree>),
    IfConfig(IfConfigBlock<'tree>),
}

/// A conditional-compilation block rebuilt from directives
#[derive(Debug, Clone)]
pub struct IfConfigBlock<'tree> {
    /// The opening `#if` directive
    pub directive: Node<'tree>,
    pub clauses: Vec<IfConfigClause<'tree>>,
}

impl IfConfigBlock<'_> {
    pub fn branches(&self) -> Vec<Branch> {
        self.clauses
            .iter()
            .map(|clause| clause.branch.clone())
            .collect()
    }
}

/// One branch of a block together with the elements it guards
#[derive(Debug, Clone)]
pub struct IfConfigClause<'tree> {
    pub branch: Branch,
    pub elements: Vec<Element<'tree>>,
}

impl IfConfigClause<'_> {
    fn new(branch: Branch) -> Self {
        Self {
            branch,
            elements: Vec::new(),
        }
    }
}

/// Get text from a tree-sitter node
pub fn node_text(node: &Node, source: &str) -> String {
    let start_byte = node.start_byte();
    let end_byte = node.end_byte();

    // Use byte slice but handle UTF-8 boundaries properly
    let content_bytes = source.as_bytes();
    if start_byte < content_bytes.len() && end_byte <= content_bytes.len() {
        String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
    } else {
        String::new()
    }
}

/// The children of `node`, with directive runs regrouped into blocks
pub fn elements<'tree>(node: Node<'tree>, source: &str) -> Vec<Element<'tree>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
    group_directives(children, source)
}

/// A block whose `#endif` has not been seen yet
struct OpenBlock<'tree> {
    directive: Node<'tree>,
    clauses: Vec<IfConfigClause<'tree>>,
    current: IfConfigClause<'tree>,
}

impl<'tree> OpenBlock<'tree> {
    fn new(directive: Node<'tree>, branch: Branch) -> Self {
        Self {
            directive,
            clauses: Vec::new(),
            current: IfConfigClause::new(branch),
        }
    }

    fn next_clause(&mut self, branch: Branch) {
        let finished = mem::replace(&mut self.current, IfConfigClause::new(branch));
        self.clauses.push(finished);
    }

    fn close(mut self) -> IfConfigBlock<'tree> {
        self.clauses.push(self.current);
        IfConfigBlock {
            directive: self.directive,
            clauses: self.clauses,
        }
    }
}

/// Where the next element belongs: the innermost open clause, or the top level
fn target<'a, 'tree>(
    root: &'a mut Vec<Element<'tree>>,
    open: &'a mut [OpenBlock<'tree>],
) -> &'a mut Vec<Element<'tree>> {
    match open.last_mut() {
        Some(block) => &mut block.current.elements,
        None => root,
    }
}

fn group_directives<'tree>(children: Vec<Node<'tree>>, source: &str) -> Vec<Element<'tree>> {
    let mut root = Vec::new();
    let mut open: Vec<OpenBlock<'tree>> = Vec::new();

    for child in children {
        if child.kind() != "directive" {
            target(&mut root, &mut open).push(Element::Node(child));
            continue;
        }

        let line = child.start_position().row + 1;
        match Directive::parse(&node_text(&child, source)) {
            Some(Directive::If(condition)) => {
                open.push(OpenBlock::new(child, Branch::If(condition)));
            }
            Some(Directive::ElseIf(condition)) => match open.last_mut() {
                Some(block) => block.next_clause(Branch::ElseIf(condition)),
                None => warn!("Ignoring #elseif without matching #if at line {}", line),
            },
            Some(Directive::Else) => match open.last_mut() {
                Some(block) => block.next_clause(Branch::Else),
                None => warn!("Ignoring #else without matching #if at line {}", line),
            },
            Some(Directive::EndIf) => match open.pop() {
                Some(block) => {
                    let closed = Element::IfConfig(block.close());
                    target(&mut root, &mut open).push(closed);
                }
                None => warn!("Ignoring #endif without matching #if at line {}", line),
            },
            Some(Directive::Other) | None => {}
        }
    }

    // Blocks left open at the end of the sibling list close here
    while let Some(block) = open.pop() {
        warn!(
            "Unterminated #if at line {}; closing at end of scope",
            block.directive.start_position().row + 1
        );
        let closed = Element::IfConfig(block.close());
        target(&mut root, &mut open).push(closed);
    }

    root
}
