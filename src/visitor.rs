//! Traversal engine
//!
//! One depth-first walk per file. The visitor owns the context stack and the
//! two output lists; every push goes through [`Visitor::enter`], whose guard
//! pops the frame again when the subtree is done and checks that the frame it
//! pops is the one it pushed. The check stays on in release builds: a
//! mismatched stack would silently corrupt the context of every later symbol.

use std::ops::{Deref, DerefMut};

use tracing::trace;
use tree_sitter::{Node, Tree};

use crate::declarations::{Declaration, DeclarationExtractor, Import};
use crate::documentation::{Documentation, DocumentationParser};
use crate::symbol::{
    CompilationCondition, ConditionalCompilationBlock, ContainerFrame, ContextFrame, FrameKind,
    Symbol,
};
use crate::syntax::{self, leading_doc_comment, Element, IfConfigBlock, SourceLocationConverter};

/// Frames enclosing the node being visited, outermost first
#[derive(Debug, Default)]
struct ContextStack {
    frames: Vec<ContextFrame>,
}

impl ContextStack {
    fn push(&mut self, frame: ContextFrame) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame, which must be of the `expected` kind
    fn pop_expecting(&mut self, expected: FrameKind) -> ContextFrame {
        match self.frames.pop() {
            Some(frame) if frame.frame_kind() == expected => frame,
            Some(frame) => panic!(
                "context stack imbalance: expected to pop {} but found {}",
                expected,
                frame.frame_kind()
            ),
            None => panic!(
                "context stack imbalance: expected to pop {} from an empty stack",
                expected
            ),
        }
    }

    fn snapshot(&self) -> Vec<ContextFrame> {
        self.frames.clone()
    }

    fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn len(&self) -> usize {
        self.frames.len()
    }
}

/// How the walk treats a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    /// class, struct or enum: emit, then visit members inside its frame
    NominalType,
    Protocol,
    /// Always pushes a frame, never emits
    Extension,
    Function,
    Initializer,
    Subscript,
    Variable,
    EnumerationCase,
    Typealias,
    AssociatedType,
    PrecedenceGroup,
    Import,
    /// Leaves that never produce symbols (deinitializers, operator declarations)
    Silent,
    /// Anything else: visit children without a frame
    Other,
}

impl NodeKind {
    fn classify(node: &Node, extractor: &DeclarationExtractor) -> Self {
        match node.kind() {
            "class_declaration" => match extractor.declaration_keyword(node).as_deref() {
                Some("class" | "struct" | "enum") => NodeKind::NominalType,
                Some("extension") => NodeKind::Extension,
                // actors are descended into without a frame
                _ => NodeKind::Other,
            },
            "protocol_declaration" => NodeKind::Protocol,
            "function_declaration" | "protocol_function_declaration" => NodeKind::Function,
            "init_declaration" => NodeKind::Initializer,
            "subscript_declaration" => NodeKind::Subscript,
            "property_declaration" | "protocol_property_declaration" => NodeKind::Variable,
            "enum_entry" => NodeKind::EnumerationCase,
            "typealias_declaration" => NodeKind::Typealias,
            "associatedtype_declaration" => NodeKind::AssociatedType,
            "precedence_group_declaration" => NodeKind::PrecedenceGroup,
            "import_declaration" => NodeKind::Import,
            "deinit_declaration" | "operator_declaration" => NodeKind::Silent,
            _ => NodeKind::Other,
        }
    }
}

pub(crate) struct Visitor<'a> {
    source: &'a str,
    converter: SourceLocationConverter,
    extractor: DeclarationExtractor<'a>,
    documentation_parser: &'a dyn DocumentationParser,
    stack: ContextStack,
    symbols: Vec<Symbol>,
    imports: Vec<Import>,
}

/// Guard returned by [`Visitor::enter`]; pops its frame on drop
struct Scope<'v, 'a> {
    visitor: &'v mut Visitor<'a>,
    kind: FrameKind,
}

impl<'a> Deref for Scope<'_, 'a> {
    type Target = Visitor<'a>;

    fn deref(&self) -> &Self::Target {
        self.visitor
    }
}

impl DerefMut for Scope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.visitor
    }
}

impl Drop for Scope<'_, '_> {
    fn drop(&mut self) {
        // Already unwinding: a second panic would abort and hide the first
        if std::thread::panicking() {
            return;
        }
        self.visitor.stack.pop_expecting(self.kind);
    }
}

impl<'a> Visitor<'a> {
    pub(crate) fn new(
        path: &str,
        source: &'a str,
        documentation_parser: &'a dyn DocumentationParser,
    ) -> Self {
        Self {
            source,
            converter: SourceLocationConverter::new(path, source),
            extractor: DeclarationExtractor::new(source),
            documentation_parser,
            stack: ContextStack::default(),
            symbols: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Walk the whole tree, returning symbols and imports in document order
    pub(crate) fn walk(mut self, tree: &Tree) -> (Vec<Symbol>, Vec<Import>) {
        assert!(
            self.stack.is_empty(),
            "context stack imbalance: {} frame(s) before traversal",
            self.stack.len()
        );

        self.visit_children(tree.root_node());

        assert!(
            self.stack.is_empty(),
            "context stack imbalance: {} frame(s) left after traversal",
            self.stack.len()
        );
        (self.symbols, self.imports)
    }

    fn enter(&mut self, frame: ContextFrame) -> Scope<'_, 'a> {
        let kind = frame.frame_kind();
        self.stack.push(frame);
        Scope {
            visitor: self,
            kind,
        }
    }

    fn visit_children(&mut self, node: Node) {
        for element in syntax::elements(node, self.source) {
            self.visit_element(element);
        }
    }

    fn visit_element(&mut self, element: Element) {
        match element {
            Element::Node(node) => self.visit_node(node),
            Element::IfConfig(block) => self.visit_if_config(block),
        }
    }

    /// The block itself pushes nothing; each clause is scoped by its own frame
    fn visit_if_config(&mut self, block: IfConfigBlock) {
        let compiled = ConditionalCompilationBlock {
            branches: block.branches(),
            location: self.converter.location(block.directive.start_byte()),
        };

        for clause in block.clauses {
            let frame = ContextFrame::Condition(CompilationCondition {
                block: compiled.clone(),
                branch: clause.branch,
            });
            let mut scope = self.enter(frame);
            for element in clause.elements {
                scope.visit_element(element);
            }
        }
    }

    fn visit_node(&mut self, node: Node) {
        let extractor = self.extractor;
        match NodeKind::classify(&node, &extractor) {
            NodeKind::NominalType => self.visit_container(node, extractor.nominal_type(node)),
            NodeKind::Protocol => self.visit_container(node, extractor.protocol(node)),
            NodeKind::Extension => match extractor.extension(node) {
                Some(extension) => {
                    let mut scope = self.enter(ContextFrame::Extension(extension));
                    scope.visit_children(node);
                }
                None => {
                    trace!("Extension without a type name at byte {}", node.start_byte());
                    self.visit_children(node);
                }
            },
            NodeKind::Function => self.emit_all(node, extractor.function(node).into_iter().collect()),
            NodeKind::Initializer => {
                self.emit_all(node, extractor.initializer(node).into_iter().collect())
            }
            NodeKind::Subscript => {
                self.emit_all(node, extractor.subscript(node).into_iter().collect())
            }
            NodeKind::Variable => self.emit_all(node, extractor.variables(node)),
            NodeKind::EnumerationCase => self.emit_all(node, extractor.enum_cases(node)),
            NodeKind::Typealias => {
                self.emit_all(node, extractor.typealias(node).into_iter().collect())
            }
            NodeKind::AssociatedType => {
                self.emit_all(node, extractor.associated_type(node).into_iter().collect())
            }
            NodeKind::PrecedenceGroup => {
                self.emit_all(node, extractor.precedence_group(node).into_iter().collect())
            }
            NodeKind::Import => match extractor.import(node) {
                Some(import) => self.imports.push(import),
                None => trace!("Unrecognized import at byte {}", node.start_byte()),
            },
            NodeKind::Silent => trace!("Skipping {} at byte {}", node.kind(), node.start_byte()),
            NodeKind::Other => self.visit_children(node),
        }
    }

    /// Types and protocols: members get the container's frame only when the
    /// container itself was emitted
    fn visit_container(&mut self, node: Node, declaration: Option<Declaration>) {
        match declaration.and_then(|declaration| self.bind(&node, vec![declaration]).pop()) {
            Some(symbol) => {
                let frame = ContextFrame::Symbol(ContainerFrame::from_declaration(symbol.declaration()));
                self.symbols.push(symbol);
                let mut scope = self.enter(frame);
                scope.visit_children(node);
            }
            None => self.visit_children(node),
        }
    }

    /// Leaves: emit every declaration the node yields, never descend
    fn emit_all(&mut self, node: Node, declarations: Vec<Declaration>) {
        let symbols = self.bind(&node, declarations);
        self.symbols.extend(symbols);
    }

    /// Attach the node's documentation and the current context to its declarations
    fn bind(&self, node: &Node, declarations: Vec<Declaration>) -> Vec<Symbol> {
        if declarations.is_empty() {
            trace!("No declaration extracted from {} at byte {}", node.kind(), node.start_byte());
            return Vec::new();
        }
        let Some(documentation) = self.document(node) else {
            return Vec::new();
        };

        let location = self.converter.location(node.start_byte());
        let context = self.stack.snapshot();
        declarations
            .into_iter()
            .map(|declaration| {
                Symbol::new(
                    declaration,
                    context.clone(),
                    documentation.clone(),
                    location.clone(),
                )
            })
            .collect()
    }

    fn document(&self, node: &Node) -> Option<Documentation> {
        let Some(raw) = leading_doc_comment(node, self.source) else {
            trace!("Undocumented {} at byte {}", node.kind(), node.start_byte());
            return None;
        };
        match self.documentation_parser.parse(&raw) {
            Ok(documentation) => Some(documentation),
            Err(error) => {
                trace!("Rejected comment on {} at byte {}: {}", node.kind(), node.start_byte(), error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::declarations::{DeclarationKind, Extension};
    use crate::documentation::MarkupParser;
    use crate::language::parse_source;
    use crate::syntax::Branch;

    fn extract(source: &str) -> (Vec<Symbol>, Vec<Import>) {
        let tree = parse_source(source, "Test.swift", &ParserConfig::default()).unwrap();
        let parser = MarkupParser;
        Visitor::new("Test.swift", source, &parser).walk(&tree)
    }

    fn names(symbols: &[Symbol]) -> Vec<&str> {
        symbols.iter().map(|symbol| symbol.name()).collect()
    }

    fn find<'s>(symbols: &'s [Symbol], name: &str) -> &'s Symbol {
        symbols
            .iter()
            .find(|symbol| symbol.name() == name)
            .unwrap_or_else(|| panic!("no symbol named {}", name))
    }

    fn extension_frame(name: &str) -> ContextFrame {
        ContextFrame::Extension(Extension {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            keyword: "extension".to_string(),
            extended_type: name.to_string(),
            inheritance: Vec::new(),
            generic_requirements: Vec::new(),
        })
    }

    const NESTED: &str = "\
/// Outer.
struct Outer {
    #if os(iOS)
    #if DEBUG
    /// Inner.
    struct Inner {
        /// Deep.
        func deep() {}
    }
    #endif
    #endif

    /// After.
    func after() {}
}

extension Outer {
    /// Extended.
    func extended() {}
}
";

    #[test]
    fn test_stack_balanced_across_nesting() {
        let (symbols, _) = extract(NESTED);

        let deep = find(&symbols, "deep");
        let kinds: Vec<FrameKind> = deep.context().iter().map(ContextFrame::frame_kind).collect();
        assert_eq!(
            kinds,
            vec![
                FrameKind::Symbol(DeclarationKind::Structure),
                FrameKind::Condition,
                FrameKind::Condition,
                FrameKind::Symbol(DeclarationKind::Structure),
            ]
        );

        // Frames pushed for the nested blocks are gone again
        let after = find(&symbols, "after");
        assert_eq!(after.context().len(), 1);
        assert_eq!(after.qualified_name(), "Outer.after");

        let extended = find(&symbols, "extended");
        assert_eq!(extended.context(), &[extension_frame("Outer")]);
    }

    #[test]
    fn test_symbols_in_document_order() {
        let (symbols, _) = extract(NESTED);
        assert_eq!(names(&symbols), vec!["Outer", "Inner", "deep", "after", "extended"]);
    }

    #[test]
    fn test_only_documented_declarations_are_emitted() {
        let source = "\
/// Documented.
func documented() {}

func bare() {}

// Ordinary comment.
func commented() {}

struct Hidden {
    /// Member of an undocumented type.
    func member() {}
}
";
        let (symbols, _) = extract(source);
        assert_eq!(names(&symbols), vec!["documented", "member"]);
        assert_eq!(
            symbols[0].documentation().summary.as_deref(),
            Some("Documented.")
        );
        // Undocumented containers push no frame
        assert!(symbols[1].context().is_empty());
        assert!(symbols.iter().all(Symbol::is_documented));
    }

    #[test]
    fn test_multi_binding_declaration_expands() {
        let source = "/// Coordinates.\nvar x = 0, y = 0, z = 0\n";
        let (symbols, _) = extract(source);

        assert_eq!(names(&symbols), vec!["x", "y", "z"]);
        assert!(symbols
            .iter()
            .all(|symbol| symbol.documentation() == symbols[0].documentation()));
        assert!(symbols
            .iter()
            .all(|symbol| symbol.location() == symbols[0].location()));
        assert_eq!(symbols[0].location().line, 2);
        assert_eq!(symbols[0].location().column, 1);
    }

    #[test]
    fn test_enum_cases_expand() {
        let source = "\
/// Suits.
enum Suit {
    /// Red suits.
    case hearts, diamonds
    /// Black suits.
    case clubs, spades
}
";
        let (symbols, _) = extract(source);
        assert_eq!(
            names(&symbols),
            vec!["Suit", "hearts", "diamonds", "clubs", "spades"]
        );
        assert_eq!(symbols[1].kind(), DeclarationKind::EnumerationCase);
        assert_eq!(symbols[4].qualified_name(), "Suit.spades");
    }

    #[test]
    fn test_context_path_structure_then_extension() {
        let source = "\
/// A structure.
struct S {
    extension S {
        /// Inside.
        func f() {}
    }
}
";
        let (symbols, _) = extract(source);
        let f = find(&symbols, "f");

        assert_eq!(f.context().len(), 2);
        assert_eq!(
            f.context()[0].frame_kind(),
            FrameKind::Symbol(DeclarationKind::Structure)
        );
        assert_eq!(f.context()[1], extension_frame("S"));
    }

    #[test]
    fn test_condition_tagging_records_only_its_branch() {
        let source = "\
#if A
/// In A.
func a() {}
#elseif B
/// In B.
func b() {}
#else
/// Otherwise.
func c() {}
#endif
";
        let (symbols, _) = extract(source);
        let b = find(&symbols, "b");

        let conditions = b.conditions();
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].branch, Branch::ElseIf("B".to_string()));
        assert_eq!(conditions[0].condition(), Some("B"));
        assert_eq!(conditions[0].block.branches.len(), 3);
        assert_eq!(conditions[0].block.location.line, 1);

        let c = find(&symbols, "c");
        assert_eq!(c.conditions()[0].condition(), None);
    }

    #[test]
    fn test_function_bodies_are_not_descended() {
        let source = "\
/// Outer function.
func outer() {
    /// Local type.
    struct Local {}
}
";
        let (symbols, _) = extract(source);
        assert_eq!(names(&symbols), vec!["outer"]);
    }

    #[test]
    fn test_members_of_each_kind() {
        let source = "\
import Foundation

/// Shapes.
public protocol Shape {
    /// Item type.
    associatedtype Item
    /// Area.
    var area: Double { get }
    /// Draws.
    func draw()
}

/// A box.
public final class Box {
    /// Creates a box.
    public init() {}
    /// Cleans up.
    deinit {}
    /// Element access.
    public subscript(index: Int) -> Int { 0 }
    /// Alias.
    typealias Index = Int
}

/// Power.
precedencegroup PowerPrecedence {
    higherThan: MultiplicationPrecedence
}
";
        let (symbols, imports) = extract(source);

        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].path, "Foundation");

        let kinds: Vec<(&str, DeclarationKind)> = symbols
            .iter()
            .map(|symbol| (symbol.name(), symbol.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Shape", DeclarationKind::Protocol),
                ("Item", DeclarationKind::AssociatedType),
                ("area", DeclarationKind::Variable),
                ("draw", DeclarationKind::Function),
                ("Box", DeclarationKind::Class),
                ("init", DeclarationKind::Initializer),
                ("subscript", DeclarationKind::Subscript),
                ("Index", DeclarationKind::Typealias),
                ("PowerPrecedence", DeclarationKind::PrecedenceGroup),
            ]
        );

        // Protocol requirements count as public
        assert!(find(&symbols, "draw").is_public());
        assert!(!find(&symbols, "PowerPrecedence").is_public());
    }

    #[test]
    #[should_panic(expected = "context stack imbalance")]
    fn test_mismatched_pop_panics() {
        let mut stack = ContextStack::default();
        stack.push(extension_frame("A"));
        stack.pop_expecting(FrameKind::Condition);
    }

    #[test]
    #[should_panic(expected = "context stack imbalance")]
    fn test_scope_detects_unbalanced_push() {
        let parser = MarkupParser;
        let mut visitor = Visitor::new("Test.swift", "", &parser);
        let location = visitor.converter.location(0);
        let mut scope = visitor.enter(extension_frame("A"));
        scope.stack.push(ContextFrame::Condition(CompilationCondition {
            block: ConditionalCompilationBlock {
                branches: vec![Branch::Else],
                location,
            },
            branch: Branch::Else,
        }));
        // The guard pops the condition while expecting its extension
        drop(scope);
    }
}
