// Documented symbols and the context frames that enclose them

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::declarations::{access_level, Declaration, DeclarationKind, Extension, GenericParameter};
use crate::documentation::Documentation;
use crate::syntax::{Branch, SourceLocation};

/// A `#if` ... `#endif` block, identified by its opening directive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionalCompilationBlock {
    pub branches: Vec<Branch>,
    pub location: SourceLocation,
}

/// One branch of a conditional-compilation block that encloses a symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompilationCondition {
    pub block: ConditionalCompilationBlock,
    pub branch: Branch,
}

impl CompilationCondition {
    /// The guard expression; `None` for `#else`
    pub fn condition(&self) -> Option<&str> {
        self.branch.condition()
    }
}

/// A documented type that members are nested in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerFrame {
    pub declaration: DeclarationKind,
    pub name: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub access_level: Option<String>,
}

impl ContainerFrame {
    pub fn from_declaration(declaration: &Declaration) -> Self {
        Self {
            declaration: declaration.kind(),
            name: declaration.name().to_string(),
            generic_parameters: declaration.generic_parameters().to_vec(),
            access_level: declaration.access_level().map(str::to_string),
        }
    }
}

/// One entry of a symbol's context, outermost first
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextFrame {
    Symbol(ContainerFrame),
    Extension(Extension),
    Condition(CompilationCondition),
}

/// Frame identity used to check that pushes and pops pair up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Symbol(DeclarationKind),
    Extension,
    Condition,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Symbol(kind) => write!(f, "symbol({})", kind),
            FrameKind::Extension => write!(f, "extension"),
            FrameKind::Condition => write!(f, "condition"),
        }
    }
}

impl ContextFrame {
    pub fn frame_kind(&self) -> FrameKind {
        match self {
            ContextFrame::Symbol(frame) => FrameKind::Symbol(frame.declaration),
            ContextFrame::Extension(_) => FrameKind::Extension,
            ContextFrame::Condition(_) => FrameKind::Condition,
        }
    }

    /// Name contributed to qualified names; conditions contribute none
    pub fn scope_name(&self) -> Option<&str> {
        match self {
            ContextFrame::Symbol(frame) => Some(&frame.name),
            ContextFrame::Extension(extension) => Some(&extension.extended_type),
            ContextFrame::Condition(_) => None,
        }
    }
}

/// A documented declaration together with where it lives
///
/// Serialized with derived `id`, `kind` and `name` fields alongside the
/// stored ones; those are recomputed, not read back, on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SymbolRecord", from = "SymbolRecord")]
pub struct Symbol {
    declaration: Declaration,
    context: Vec<ContextFrame>,
    documentation: Documentation,
    location: SourceLocation,
}

impl Symbol {
    pub fn new(
        declaration: Declaration,
        context: Vec<ContextFrame>,
        documentation: Documentation,
        location: SourceLocation,
    ) -> Self {
        Self {
            declaration,
            context,
            documentation,
            location,
        }
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// Enclosing frames, outermost first
    pub fn context(&self) -> &[ContextFrame] {
        &self.context
    }

    pub fn documentation(&self) -> &Documentation {
        &self.documentation
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn name(&self) -> &str {
        self.declaration.name()
    }

    pub fn kind(&self) -> DeclarationKind {
        self.declaration.kind()
    }

    /// `Outer.Extended.name`; compilation conditions do not contribute
    pub fn qualified_name(&self) -> String {
        self.context
            .iter()
            .filter_map(ContextFrame::scope_name)
            .chain(std::iter::once(self.name()))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Stable identifier (MD5 of file, qualified name and position)
    pub fn id(&self) -> String {
        let input = format!(
            "{}:{}:{}:{}",
            self.location.file,
            self.qualified_name(),
            self.location.line,
            self.location.column
        );
        let digest = md5::compute(input.as_bytes());
        format!("{:x}", digest)
    }

    /// Compilation conditions that must hold for the symbol to exist
    pub fn conditions(&self) -> Vec<&CompilationCondition> {
        self.context
            .iter()
            .filter_map(|frame| match frame {
                ContextFrame::Condition(condition) => Some(condition),
                _ => None,
            })
            .collect()
    }

    /// Declared `public`/`open`, a protocol member, or nested without an
    /// explicit access level in a public context
    pub fn is_public(&self) -> bool {
        if let Some(level) = self.declaration.access_level() {
            return is_public_level(level);
        }

        let enclosing = self
            .context
            .iter()
            .rev()
            .find(|frame| !matches!(frame, ContextFrame::Condition(_)));
        match enclosing {
            Some(ContextFrame::Symbol(frame)) => {
                frame.declaration == DeclarationKind::Protocol
                    || frame.access_level.as_deref().is_some_and(is_public_level)
            }
            Some(ContextFrame::Extension(extension)) => {
                access_level(&extension.modifiers).is_some_and(is_public_level)
            }
            Some(ContextFrame::Condition(_)) | None => false,
        }
    }

    pub fn is_documented(&self) -> bool {
        !self.documentation.is_empty()
    }
}

fn is_public_level(level: &str) -> bool {
    level == "public" || level == "open"
}

/// Wire form of a `Symbol`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SymbolRecord {
    #[serde(default)]
    id: String,
    kind: DeclarationKind,
    #[serde(default)]
    name: String,
    declaration: Declaration,
    context: Vec<ContextFrame>,
    documentation: Documentation,
    location: SourceLocation,
}

impl From<Symbol> for SymbolRecord {
    fn from(symbol: Symbol) -> Self {
        Self {
            id: symbol.id(),
            kind: symbol.kind(),
            name: symbol.name().to_string(),
            declaration: symbol.declaration,
            context: symbol.context,
            documentation: symbol.documentation,
            location: symbol.location,
        }
    }
}

impl From<SymbolRecord> for Symbol {
    fn from(record: SymbolRecord) -> Self {
        Symbol::new(
            record.declaration,
            record.context,
            record.documentation,
            record.location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::{Function, FunctionSignature, Modifier};

    fn location() -> SourceLocation {
        SourceLocation {
            file: "Sources/Shapes.swift".to_string(),
            line: 3,
            column: 5,
            offset: 40,
        }
    }

    fn function(name: &str, modifiers: Vec<Modifier>) -> Declaration {
        Declaration::Function(Function {
            attributes: Vec::new(),
            modifiers,
            keyword: "func".to_string(),
            name: name.to_string(),
            generic_parameters: Vec::new(),
            signature: FunctionSignature::default(),
            generic_requirements: Vec::new(),
        })
    }

    fn container(kind: DeclarationKind, name: &str, access: Option<&str>) -> ContextFrame {
        ContextFrame::Symbol(ContainerFrame {
            declaration: kind,
            name: name.to_string(),
            generic_parameters: Vec::new(),
            access_level: access.map(str::to_string),
        })
    }

    fn extension(name: &str, modifiers: Vec<Modifier>) -> ContextFrame {
        ContextFrame::Extension(Extension {
            attributes: Vec::new(),
            modifiers,
            keyword: "extension".to_string(),
            extended_type: name.to_string(),
            inheritance: Vec::new(),
            generic_requirements: Vec::new(),
        })
    }

    fn condition(branch: Branch) -> ContextFrame {
        ContextFrame::Condition(CompilationCondition {
            block: ConditionalCompilationBlock {
                branches: vec![branch.clone()],
                location: location(),
            },
            branch,
        })
    }

    fn documented(summary: &str) -> Documentation {
        Documentation {
            summary: Some(summary.to_string()),
            ..Documentation::default()
        }
    }

    #[test]
    fn test_qualified_name_skips_conditions() {
        let symbol = Symbol::new(
            function("area", Vec::new()),
            vec![
                extension("Geometry", Vec::new()),
                condition(Branch::If("DEBUG".to_string())),
                container(DeclarationKind::Structure, "Circle", None),
            ],
            documented("Area."),
            location(),
        );
        assert_eq!(symbol.qualified_name(), "Geometry.Circle.area");
        assert_eq!(symbol.conditions().len(), 1);
        assert_eq!(symbol.conditions()[0].condition(), Some("DEBUG"));
    }

    #[test]
    fn test_id_is_stable_md5() {
        let symbol = Symbol::new(function("f", Vec::new()), Vec::new(), documented("F."), location());
        let id = symbol.id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, symbol.clone().id());

        let other = Symbol::new(function("g", Vec::new()), Vec::new(), documented("G."), location());
        assert_ne!(id, other.id());
    }

    #[test]
    fn test_visibility_rules() {
        let explicit = Symbol::new(
            function("f", vec![Modifier::named("public")]),
            Vec::new(),
            documented("F."),
            location(),
        );
        assert!(explicit.is_public());

        let top_level = Symbol::new(function("f", Vec::new()), Vec::new(), documented("F."), location());
        assert!(!top_level.is_public());

        let requirement = Symbol::new(
            function("f", Vec::new()),
            vec![container(DeclarationKind::Protocol, "P", None)],
            documented("F."),
            location(),
        );
        assert!(requirement.is_public());

        let in_public_extension = Symbol::new(
            function("f", Vec::new()),
            vec![
                extension("Int", vec![Modifier::named("public")]),
                condition(Branch::Else),
            ],
            documented("F."),
            location(),
        );
        assert!(in_public_extension.is_public());

        let private_member = Symbol::new(
            function("f", vec![Modifier::named("private")]),
            vec![container(DeclarationKind::Class, "C", Some("open"))],
            documented("F."),
            location(),
        );
        assert!(!private_member.is_public());
    }

    #[test]
    fn test_serialized_shape() {
        let symbol = Symbol::new(
            function("draw", Vec::new()),
            vec![container(DeclarationKind::Class, "Canvas", None)],
            documented("Draws."),
            location(),
        );
        let json = serde_json::to_value(&symbol).unwrap();

        assert_eq!(json["kind"], "function");
        assert_eq!(json["name"], "draw");
        assert_eq!(json["id"], symbol.id());
        assert_eq!(json["declaration"]["kind"], "function");
        assert_eq!(json["context"][0]["kind"], "symbol");
        assert_eq!(json["context"][0]["name"], "Canvas");
        assert_eq!(json["location"]["line"], 3);

        let restored: Symbol = serde_json::from_value(json).unwrap();
        assert_eq!(restored, symbol);
    }

    #[test]
    fn test_frame_kinds() {
        assert_eq!(
            container(DeclarationKind::Enumeration, "E", None).frame_kind(),
            FrameKind::Symbol(DeclarationKind::Enumeration)
        );
        assert_eq!(extension("E", Vec::new()).frame_kind(), FrameKind::Extension);
        assert_eq!(condition(Branch::Else).frame_kind(), FrameKind::Condition);
        assert_eq!(
            FrameKind::Symbol(DeclarationKind::Class).to_string(),
            "symbol(class)"
        );
    }
}
