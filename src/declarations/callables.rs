use tree_sitter::Node;

use super::{child_of_kind, Declaration, DeclarationExtractor, Function, Initializer, Subscript};

/// Extracts Swift callable members: functions, operator implementations,
/// protocol method requirements, initializers and subscripts
impl DeclarationExtractor<'_> {
    pub fn function(&self, node: Node) -> Option<Declaration> {
        if !matches!(
            node.kind(),
            "function_declaration" | "protocol_function_declaration"
        ) {
            return None;
        }

        let name = match node.child_by_field_name("name") {
            Some(name) => self.compact_text(&name),
            None => self.text(&child_of_kind(&node, &["simple_identifier"])?),
        };
        if name.is_empty() {
            return None;
        }

        let (attributes, modifiers) = self.extract_modifiers(&node);
        Some(Declaration::Function(Function {
            attributes,
            modifiers,
            keyword: "func".to_string(),
            name,
            generic_parameters: self.extract_generic_parameters(&node),
            signature: self.extract_function_signature(&node),
            generic_requirements: self.extract_generic_requirements(&node),
        }))
    }

    pub fn initializer(&self, node: Node) -> Option<Declaration> {
        if node.kind() != "init_declaration" {
            return None;
        }

        // `init?` / `init!`: the marker sits between the keyword and the parameter list
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        let keyword_end = children.iter().find(|c| c.kind() == "init").map(|c| c.end_byte());
        let params_start = children.iter().find(|c| c.kind() == "(").map(|c| c.start_byte());
        let optional = match (keyword_end, params_start) {
            (Some(start), Some(end)) if start <= end => self
                .source
                .get(start..end)
                .map(str::trim_start)
                .and_then(|marker| marker.chars().next())
                .filter(|c| matches!(c, '?' | '!'))
                .map(String::from),
            _ => None,
        };

        let (attributes, modifiers) = self.extract_modifiers(&node);
        let (is_async, throws) = self.extract_effects(&node);
        Some(Declaration::Initializer(Initializer {
            attributes,
            modifiers,
            keyword: "init".to_string(),
            optional,
            generic_parameters: self.extract_generic_parameters(&node),
            parameters: self.extract_parameters(&node),
            is_async,
            throws,
            generic_requirements: self.extract_generic_requirements(&node),
        }))
    }

    pub fn subscript(&self, node: Node) -> Option<Declaration> {
        if node.kind() != "subscript_declaration" {
            return None;
        }

        let accessors = match child_of_kind(&node, &["computed_property"]) {
            Some(body) => self.extract_accessors(&body),
            None => Vec::new(),
        };

        let (attributes, modifiers) = self.extract_modifiers(&node);
        Some(Declaration::Subscript(Subscript {
            attributes,
            modifiers,
            keyword: "subscript".to_string(),
            generic_parameters: self.extract_generic_parameters(&node),
            indices: self.extract_parameters(&node),
            return_type: self.extract_return_type(&node),
            generic_requirements: self.extract_generic_requirements(&node),
            accessors,
        }))
    }
}
