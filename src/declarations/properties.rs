use tree_sitter::Node;

use super::{child_of_kind, Declaration, DeclarationExtractor, Variable};

/// One `name[: Type][= value][{ accessors }]` binding of a property declaration
#[derive(Debug, Default)]
struct Binding {
    name: String,
    type_annotation: Option<String>,
    initialized_value: Option<String>,
    accessors: Vec<String>,
}

/// Extracts Swift stored and computed properties, including protocol
/// property requirements
impl DeclarationExtractor<'_> {
    /// One `Variable` per binding; `let a = 1, b = 2` yields two
    pub fn variables(&self, node: Node) -> Vec<Declaration> {
        if !matches!(
            node.kind(),
            "property_declaration" | "protocol_property_declaration"
        ) {
            return Vec::new();
        }

        let keyword = self.binding_keyword(&node);
        let bindings = self.extract_bindings(&node);
        if bindings.is_empty() {
            return Vec::new();
        }

        let (attributes, modifiers) = self.extract_modifiers(&node);
        bindings
            .into_iter()
            .map(|binding| {
                Declaration::Variable(Variable {
                    attributes: attributes.clone(),
                    modifiers: modifiers.clone(),
                    keyword: keyword.clone(),
                    name: binding.name,
                    type_annotation: binding.type_annotation,
                    initialized_value: binding.initialized_value,
                    accessors: binding.accessors,
                })
            })
            .collect()
    }

    fn binding_keyword(&self, node: &Node) -> String {
        if let Some(pattern) = child_of_kind(node, &["value_binding_pattern"]) {
            let text = self.compact_text(&pattern);
            // `value_binding_pattern` may carry the mutability and nothing else
            if let Some(keyword) = text.split_whitespace().find(|w| *w == "let" || *w == "var") {
                return keyword.to_string();
            }
        }
        if child_of_kind(node, &["let"]).is_some() {
            "let".to_string()
        } else {
            "var".to_string()
        }
    }

    fn extract_bindings(&self, node: &Node) -> Vec<Binding> {
        let mut bindings: Vec<Binding> = Vec::new();
        let mut after_equals = false;

        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return bindings;
        }
        loop {
            let child = cursor.node();
            let field = cursor.field_name();

            if field == Some("name") || (child.kind() == "pattern" && field.is_none()) {
                bindings.push(Binding {
                    name: self.binding_name(&child),
                    ..Binding::default()
                });
                after_equals = false;
            } else if let Some(binding) = bindings.last_mut() {
                match child.kind() {
                    "type_annotation" => {
                        binding.type_annotation = self.annotation_type(&child);
                    }
                    "computed_property"
                    | "willset_didset_block"
                    | "protocol_property_requirements" => {
                        binding.accessors = self.extract_accessors(&child);
                    }
                    "=" => after_equals = true,
                    "," => after_equals = false,
                    _ if field == Some("value") || (after_equals && child.is_named()) => {
                        binding.initialized_value = Some(self.compact_text(&child));
                        after_equals = false;
                    }
                    _ => {}
                }
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }

        bindings.retain(|binding| !binding.name.is_empty());
        propagate_annotations(&mut bindings);
        bindings
    }

    fn binding_name(&self, pattern: &Node) -> String {
        if pattern.kind() == "simple_identifier" {
            return self.text(pattern);
        }
        // `pattern` wraps a single identifier for ordinary bindings
        let mut cursor = pattern.walk();
        let identifiers: Vec<Node> = pattern
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "simple_identifier")
            .collect();
        match identifiers.as_slice() {
            [identifier] => self.text(identifier),
            _ => self.compact_text(pattern),
        }
    }

    fn annotation_type(&self, annotation: &Node) -> Option<String> {
        let text = match annotation.child_by_field_name("type") {
            Some(type_node) => self.compact_text(&type_node),
            None => self
                .compact_text(annotation)
                .trim_start_matches(':')
                .trim()
                .to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// Accessor names of a computed property, observer block or requirement
    /// (`get`, `set`, `willSet`, `didSet`, ...)
    pub(crate) fn extract_accessors(&self, node: &Node) -> Vec<String> {
        let mut accessors = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let accessor = match child.kind() {
                "computed_getter" | "getter_specifier" => Some("get"),
                "computed_setter" | "setter_specifier" => Some("set"),
                "computed_modify" | "modify_specifier" => Some("_modify"),
                "willset_clause" => Some("willSet"),
                "didset_clause" => Some("didSet"),
                _ => None,
            };
            if let Some(accessor) = accessor {
                accessors.push(accessor.to_string());
            }
        }

        // A computed property without explicit accessors is a getter
        if accessors.is_empty() && node.kind() == "computed_property" {
            accessors.push("get".to_string());
        }

        accessors
    }
}

/// `var a, b: Int` annotates both bindings; a binding without its own
/// annotation and initializer takes the next annotation after it
fn propagate_annotations(bindings: &mut [Binding]) {
    let mut next_annotation: Option<String> = None;
    for binding in bindings.iter_mut().rev() {
        if binding.type_annotation.is_some() {
            next_annotation = binding.type_annotation.clone();
        } else if binding.initialized_value.is_none() && binding.accessors.is_empty() {
            binding.type_annotation = next_annotation.clone();
        } else {
            next_annotation = None;
        }
    }
}
