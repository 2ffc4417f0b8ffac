use tree_sitter::Node;

use super::signatures::split_top_level;
use super::{
    child_of_kind, children_of_kind, Declaration, DeclarationExtractor, PrecedenceGroup,
    PrecedenceRelation,
};

/// Extracts `precedencegroup` declarations
impl DeclarationExtractor<'_> {
    pub fn precedence_group(&self, node: Node) -> Option<Declaration> {
        if node.kind() != "precedence_group_declaration" {
            return None;
        }

        let name = match node.child_by_field_name("name") {
            Some(name) => self.text(&name),
            None => self.text(&child_of_kind(&node, &["simple_identifier"])?),
        };

        let mut assignment = None;
        let mut associativity = None;
        let mut relations = Vec::new();

        let attribute_nodes = child_of_kind(&node, &["precedence_group_attributes"])
            .map(|list| children_of_kind(&list, &["precedence_group_attribute"]))
            .unwrap_or_default();
        for attribute in attribute_nodes {
            let text = self.compact_text(&attribute);
            let Some((key, value)) = text.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "assignment" => assignment = Some(value == "true"),
                "associativity" => associativity = Some(value.to_string()),
                relation => relations.push(PrecedenceRelation {
                    relation: relation.to_string(),
                    groups: split_top_level(value, ','),
                }),
            }
        }

        let (attributes, modifiers) = self.extract_modifiers(&node);
        Some(Declaration::PrecedenceGroup(PrecedenceGroup {
            attributes,
            modifiers,
            keyword: "precedencegroup".to_string(),
            name,
            assignment,
            associativity,
            relations,
        }))
    }
}
