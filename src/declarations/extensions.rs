use tree_sitter::Node;

use super::{
    child_of_kind, Declaration, DeclarationExtractor, Extension, Import, Typealias,
};

const IMPORT_KINDS: &[&str] = &[
    "typealias", "struct", "class", "enum", "protocol", "let", "var", "func",
];

/// Extracts extensions, type aliases and imports
impl DeclarationExtractor<'_> {
    pub fn extension(&self, node: Node) -> Option<Extension> {
        if node.kind() != "class_declaration" {
            return None;
        }
        let keyword = self.declaration_keyword(&node)?;
        if keyword != "extension" {
            return None;
        }

        let (attributes, modifiers) = self.extract_modifiers(&node);
        Some(Extension {
            attributes,
            modifiers,
            keyword,
            extended_type: self.type_name(&node)?,
            inheritance: self.extract_inheritance(&node),
            generic_requirements: self.extract_generic_requirements(&node),
        })
    }

    pub fn typealias(&self, node: Node) -> Option<Declaration> {
        if node.kind() != "typealias_declaration" {
            return None;
        }

        let name = self.type_name(&node)?;
        let (attributes, modifiers) = self.extract_modifiers(&node);

        let initialized_type = match node.child_by_field_name("value") {
            Some(value) => Some(self.compact_text(&value)),
            // Fall back to whatever follows `=`
            None => {
                let text = self.compact_text(&node);
                text.split_once('=').map(|(_, value)| value.trim().to_string())
            }
        };

        Some(Declaration::Typealias(Typealias {
            attributes,
            modifiers,
            keyword: "typealias".to_string(),
            name,
            generic_parameters: self.extract_generic_parameters(&node),
            initialized_type,
        }))
    }

    pub fn import(&self, node: Node) -> Option<Import> {
        if node.kind() != "import_declaration" {
            return None;
        }

        let path_node = child_of_kind(&node, &["identifier"])?;
        let path: String = self
            .text(&path_node)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if path.is_empty() {
            return None;
        }

        let mut cursor = node.walk();
        let import_kind = node
            .children(&mut cursor)
            .take_while(|c| c.kind() != "identifier")
            .find(|c| !c.is_named() && IMPORT_KINDS.contains(&c.kind()))
            .map(|c| c.kind().to_string());

        let (attributes, modifiers) = self.extract_modifiers(&node);
        Some(Import {
            attributes,
            modifiers,
            keyword: "import".to_string(),
            import_kind,
            path,
        })
    }
}
