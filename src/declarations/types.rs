use tree_sitter::Node;

use super::{Class, Declaration, DeclarationExtractor, Enumeration, Structure};

/// Extracts Swift nominal type declarations: classes, structs and enums
///
/// All three share the `class_declaration` node; the `declaration_kind`
/// keyword tells them apart. Actors and extensions share it too but are not
/// nominal type symbols, so they yield `None` here.
impl DeclarationExtractor<'_> {
    pub fn nominal_type(&self, node: Node) -> Option<Declaration> {
        if node.kind() != "class_declaration" {
            return None;
        }

        let keyword = self.declaration_keyword(&node)?;
        let name = self.type_name(&node)?;
        let (attributes, modifiers) = self.extract_modifiers(&node);
        let generic_parameters = self.extract_generic_parameters(&node);
        let inheritance = self.extract_inheritance(&node);
        let generic_requirements = self.extract_generic_requirements(&node);

        match keyword.as_str() {
            "class" => Some(Declaration::Class(Class {
                attributes,
                modifiers,
                keyword,
                name,
                generic_parameters,
                inheritance,
                generic_requirements,
            })),
            "struct" => Some(Declaration::Structure(Structure {
                attributes,
                modifiers,
                keyword,
                name,
                generic_parameters,
                inheritance,
                generic_requirements,
            })),
            "enum" => Some(Declaration::Enumeration(Enumeration {
                attributes,
                modifiers,
                keyword,
                name,
                generic_parameters,
                inheritance,
                generic_requirements,
            })),
            _ => None,
        }
    }

    /// Declared name of a type or extension (`Foo`, `Array<Int>`, `Outer.Inner`)
    pub(crate) fn type_name(&self, node: &Node) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return Some(self.compact_text(&name));
        }

        let mut cursor = node.walk();
        let name_node = node
            .children(&mut cursor)
            .find(|c| c.kind() == "type_identifier" || c.kind() == "user_type");
        name_node.map(|n| self.compact_text(&n))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{find_node, parse};
    use super::super::{DeclarationKind, GenericRelation};
    use super::*;

    fn extract(source: &str) -> Option<Declaration> {
        let tree = parse(source);
        let extractor = DeclarationExtractor::new(source);
        let node = find_node(tree.root_node(), "class_declaration")?;
        extractor.nominal_type(node)
    }

    #[test]
    fn test_class_with_inheritance_and_modifiers() {
        let declaration = extract("open class View: Responder, Drawable {}").unwrap();
        assert_eq!(declaration.kind(), DeclarationKind::Class);

        let Declaration::Class(class) = declaration else {
            panic!("expected class");
        };
        assert_eq!(class.name, "View");
        assert_eq!(class.modifiers[0].name, "open");
        assert_eq!(class.inheritance, vec!["Responder", "Drawable"]);
    }

    #[test]
    fn test_generic_struct_with_constraints() {
        let declaration =
            extract("public struct Pair<A, B>: Equatable where A: Equatable, B: Equatable {}")
                .unwrap();

        let Declaration::Structure(structure) = declaration else {
            panic!("expected structure");
        };
        assert_eq!(structure.name, "Pair");
        assert_eq!(structure.generic_parameters.len(), 2);
        assert_eq!(structure.inheritance, vec!["Equatable"]);
        assert_eq!(structure.generic_requirements.len(), 2);
        assert_eq!(
            structure.generic_requirements[0].relation,
            GenericRelation::Conformance
        );
    }

    #[test]
    fn test_indirect_enum() {
        let declaration = extract("indirect enum Tree { case leaf }").unwrap();
        assert_eq!(declaration.kind(), DeclarationKind::Enumeration);
        assert_eq!(declaration.name(), "Tree");
        assert!(declaration.modifiers().iter().any(|m| m.name == "indirect"));
        assert_eq!(declaration.signature(), "indirect enum Tree");
    }

    #[test]
    fn test_extension_is_not_a_nominal_type() {
        assert_eq!(extract("extension Int {}"), None);
    }
}
