// Declaration data model
//
// One plain struct per Swift declaration kind plus the shared pieces they are
// built from (attributes, modifiers, generics, parameters). These carry no
// behavior beyond accessors and rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An attribute such as `@available(iOS 13, *)` or `@objc`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub arguments: Vec<String>,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "({})", self.arguments.join(", "))?;
        }
        Ok(())
    }
}

/// A declaration modifier such as `public`, `static` or `private(set)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub detail: Option<String>,
}

impl Modifier {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}({})", self.name, detail),
            None => write!(f, "{}", self.name),
        }
    }
}

/// `T` or `T: Equatable` inside angle brackets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
}

impl fmt::Display for GenericParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(type_name) => write!(f, "{}: {}", self.name, type_name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericRelation {
    SameType,
    Conformance,
}

/// One clause of a `where` constraint list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericRequirement {
    pub left_type: String,
    pub relation: GenericRelation,
    pub right_type: String,
}

impl fmt::Display for GenericRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation {
            GenericRelation::SameType => write!(f, "{} == {}", self.left_type, self.right_type),
            GenericRelation::Conformance => write!(f, "{}: {}", self.left_type, self.right_type),
        }
    }
}

/// A function, initializer or subscript parameter, or an associated value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub attributes: Vec<Attribute>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub variadic: bool,
    pub default_value: Option<String>,
}

impl Parameter {
    /// The name used inside the body (`x` in `_ x: Int`)
    pub fn local_name(&self) -> Option<&str> {
        self.second_name.as_deref().or(self.first_name.as_deref())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.attributes.iter().map(|a| a.to_string()).collect();
        let names: Vec<&str> = [self.first_name.as_deref(), self.second_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !names.is_empty() {
            parts.push(names.join(" "));
        }
        let mut rendered = parts.join(" ");

        if let Some(type_name) = &self.type_name {
            if names.is_empty() {
                rendered.push_str(type_name);
            } else {
                rendered.push_str(&format!(": {}", type_name));
            }
        }
        if self.variadic {
            rendered.push_str("...");
        }
        if let Some(default_value) = &self.default_value {
            rendered.push_str(&format!(" = {}", default_value));
        }
        write!(f, "{}", rendered)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Class {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub inheritance: Vec<String>,
    pub generic_requirements: Vec<GenericRequirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Structure {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub inheritance: Vec<String>,
    pub generic_requirements: Vec<GenericRequirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enumeration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub inheritance: Vec<String>,
    pub generic_requirements: Vec<GenericRequirement>,
}

/// A single case name; `case a, b(Int)` yields two of these
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumerationCase {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub associated_value: Option<Vec<Parameter>>,
    pub raw_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Protocol {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub inheritance: Vec<String>,
    pub generic_requirements: Vec<GenericRequirement>,
}

/// An `extension` block; appears only as a context frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extension {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub extended_type: String,
    pub inheritance: Vec<String>,
    pub generic_requirements: Vec<GenericRequirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub input: Vec<Parameter>,
    pub output: Option<String>,
    pub is_async: bool,
    /// `throws`, `rethrows` or a typed `throws(E)`
    pub throws: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Function {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    /// Identifier or operator (`==`)
    pub name: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub signature: FunctionSignature,
    pub generic_requirements: Vec<GenericRequirement>,
}

impl Function {
    /// Operator implementations are functions whose name is not an identifier
    pub fn is_operator(&self) -> bool {
        self.name
            .chars()
            .next()
            .map(|c| !(c.is_alphabetic() || c == '_' || c == '`'))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Initializer {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    /// `?` or `!` for failable initializers
    pub optional: Option<String>,
    pub generic_parameters: Vec<GenericParameter>,
    pub parameters: Vec<Parameter>,
    pub is_async: bool,
    pub throws: Option<String>,
    pub generic_requirements: Vec<GenericRequirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscript {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub indices: Vec<Parameter>,
    pub return_type: Option<String>,
    pub generic_requirements: Vec<GenericRequirement>,
    pub accessors: Vec<String>,
}

/// A single binding; `var a, b: Int` yields two of these
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    /// `let` or `var`
    pub keyword: String,
    pub name: String,
    pub type_annotation: Option<String>,
    pub initialized_value: Option<String>,
    pub accessors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Typealias {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub initialized_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssociatedType {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub inheritance: Vec<String>,
    pub default_type: Option<String>,
    pub generic_requirements: Vec<GenericRequirement>,
}

/// `higherThan: A` / `lowerThan: B`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrecedenceRelation {
    pub relation: String,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrecedenceGroup {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    pub name: String,
    pub assignment: Option<bool>,
    pub associativity: Option<String>,
    pub relations: Vec<PrecedenceRelation>,
}

/// An `import` declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Import {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: String,
    /// `struct` in `import struct Foundation.Date`
    pub import_kind: Option<String>,
    /// Dot-joined module path
    pub path: String,
}

impl Import {
    pub fn path_components(&self) -> Vec<&str> {
        self.path.split('.').collect()
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attribute in &self.attributes {
            write!(f, "{} ", attribute)?;
        }
        write!(f, "{}", self.keyword)?;
        if let Some(kind) = &self.import_kind {
            write!(f, " {}", kind)?;
        }
        write!(f, " {}", self.path)
    }
}
