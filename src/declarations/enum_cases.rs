use tree_sitter::Node;

use super::signatures::{find_top_level, split_top_level};
use super::{Declaration, DeclarationExtractor, EnumerationCase, Parameter};

/// Extracts Swift enum cases; `case a, b(Int)` yields one declaration per name
impl DeclarationExtractor<'_> {
    pub fn enum_cases(&self, node: Node) -> Vec<Declaration> {
        if node.kind() != "enum_entry" {
            return Vec::new();
        }

        let mut cases: Vec<(String, Option<Vec<Parameter>>, Option<String>)> = Vec::new();

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                match (cursor.field_name(), child.kind()) {
                    (Some("name"), _) | (None, "simple_identifier") => {
                        cases.push((self.text(&child), None, None));
                    }
                    (Some("data_contents"), _) | (_, "enum_type_parameters") => {
                        if let Some(case) = cases.last_mut() {
                            case.1 = Some(parse_associated_value(&self.compact_text(&child)));
                        }
                    }
                    (Some("raw_value"), _) => {
                        if let Some(case) = cases.last_mut() {
                            case.2 = Some(self.compact_text(&child));
                        }
                    }
                    _ => {}
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        let (attributes, modifiers) = self.extract_modifiers(&node);
        cases
            .into_iter()
            .map(|(name, associated_value, raw_value)| {
                Declaration::EnumerationCase(EnumerationCase {
                    attributes: attributes.clone(),
                    modifiers: modifiers.clone(),
                    keyword: "case".to_string(),
                    name,
                    associated_value,
                    raw_value,
                })
            })
            .collect()
    }
}

/// `(x: Int, _ y: String = "")` -> parameters
fn parse_associated_value(text: &str) -> Vec<Parameter> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text);

    split_top_level(inner, ',')
        .into_iter()
        .map(|element| {
            let (element, default_value) = match find_top_level(&element, '=') {
                Some(index) => (
                    element[..index].trim().to_string(),
                    Some(element[index + 1..].trim().to_string()),
                ),
                None => (element, None),
            };

            // Labels only count when everything before the colon is identifiers
            let labelled = find_top_level(&element, ':').and_then(|index| {
                let labels: Vec<&str> = element[..index].split_whitespace().collect();
                let valid = !labels.is_empty()
                    && labels.len() <= 2
                    && labels
                        .iter()
                        .all(|l| l.chars().all(|c| c.is_alphanumeric() || c == '_'));
                valid.then(|| {
                    (
                        labels.iter().map(|l| l.to_string()).collect::<Vec<_>>(),
                        element[index + 1..].trim().to_string(),
                    )
                })
            });

            let (labels, type_name) = labelled.unwrap_or_else(|| (Vec::new(), element.clone()));
            let mut labels = labels.into_iter();
            Parameter {
                first_name: labels.next(),
                second_name: labels.next(),
                type_name: Some(type_name),
                default_value,
                ..Parameter::default()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{find_node, parse};
    use super::*;

    fn cases(source: &str) -> Vec<EnumerationCase> {
        let tree = parse(source);
        let extractor = DeclarationExtractor::new(source);
        let node = find_node(tree.root_node(), "enum_entry").unwrap();
        extractor
            .enum_cases(node)
            .into_iter()
            .map(|declaration| match declaration {
                Declaration::EnumerationCase(case) => case,
                other => panic!("expected case, got {:?}", other.kind()),
            })
            .collect()
    }

    #[test]
    fn test_multiple_cases_in_one_entry() {
        let cases = cases("enum Direction { case north, south, east, west }");
        let names: Vec<&str> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["north", "south", "east", "west"]);
    }

    #[test]
    fn test_associated_values() {
        let cases = cases("enum Shape { case rect(width: Double, height: Double), circle(Double) }");
        assert_eq!(cases.len(), 2);

        let rect = cases[0].associated_value.as_ref().unwrap();
        assert_eq!(rect.len(), 2);
        assert_eq!(rect[0].first_name.as_deref(), Some("width"));
        assert_eq!(rect[0].type_name.as_deref(), Some("Double"));

        let circle = cases[1].associated_value.as_ref().unwrap();
        assert_eq!(circle[0].first_name, None);
        assert_eq!(circle[0].type_name.as_deref(), Some("Double"));
    }

    #[test]
    fn test_raw_values() {
        let cases = cases("enum Code: Int { case ok = 200 }");
        assert_eq!(cases[0].name, "ok");
        assert_eq!(cases[0].raw_value.as_deref(), Some("200"));
        assert_eq!(
            Declaration::EnumerationCase(cases[0].clone()).signature(),
            "case ok = 200"
        );
    }

    #[test]
    fn test_parse_associated_value_with_closure_type() {
        let parameters = parse_associated_value("(handler: (Int) -> Void, [String: Int])");
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].type_name.as_deref(), Some("(Int) -> Void"));
        assert_eq!(parameters[1].first_name, None);
        assert_eq!(parameters[1].type_name.as_deref(), Some("[String: Int]"));
    }
}
