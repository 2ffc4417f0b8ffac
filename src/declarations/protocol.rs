use tree_sitter::Node;

use super::{AssociatedType, Declaration, DeclarationExtractor, Protocol};

/// Extracts protocols and their associated type requirements
impl DeclarationExtractor<'_> {
    pub fn protocol(&self, node: Node) -> Option<Declaration> {
        if node.kind() != "protocol_declaration" {
            return None;
        }

        let (attributes, modifiers) = self.extract_modifiers(&node);
        Some(Declaration::Protocol(Protocol {
            attributes,
            modifiers,
            keyword: "protocol".to_string(),
            name: self.type_name(&node)?,
            inheritance: self.extract_inheritance(&node),
            generic_requirements: self.extract_generic_requirements(&node),
        }))
    }

    pub fn associated_type(&self, node: Node) -> Option<Declaration> {
        if node.kind() != "associatedtype_declaration" {
            return None;
        }

        let inheritance = node
            .child_by_field_name("must_inherit")
            .map(|inherited| vec![self.compact_text(&inherited)])
            .unwrap_or_default();
        let default_type = node
            .child_by_field_name("default_value")
            .map(|default| self.compact_text(&default));

        let (attributes, modifiers) = self.extract_modifiers(&node);
        Some(Declaration::AssociatedType(AssociatedType {
            attributes,
            modifiers,
            keyword: "associatedtype".to_string(),
            name: self.type_name(&node)?,
            inheritance,
            default_type,
            generic_requirements: self.extract_generic_requirements(&node),
        }))
    }
}
