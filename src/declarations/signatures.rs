use tree_sitter::Node;

use super::{
    child_of_kind, children_of_kind, Attribute, Declaration, DeclarationExtractor,
    FunctionSignature, GenericParameter, GenericRelation, GenericRequirement, Modifier, Parameter,
};

/// Extracts the pieces shared by many declaration kinds: modifiers,
/// attributes, generics, inheritance and parameter lists
impl DeclarationExtractor<'_> {
    /// Attributes and modifiers from the declaration's `modifiers` node
    pub(crate) fn extract_modifiers(&self, node: &Node) -> (Vec<Attribute>, Vec<Modifier>) {
        let mut attributes = Vec::new();
        let mut modifiers = Vec::new();

        if let Some(modifiers_list) = child_of_kind(node, &["modifiers"]) {
            let mut cursor = modifiers_list.walk();
            for child in modifiers_list.named_children(&mut cursor) {
                if child.kind() == "attribute" {
                    if let Some(attribute) = parse_attribute(&self.compact_text(&child)) {
                        attributes.push(attribute);
                    }
                } else {
                    modifiers.push(parse_modifier(&self.compact_text(&child)));
                }
            }
        }

        // Swift parser reports some keywords (`class func`, `indirect enum`) outside `modifiers`
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let keyword = child.kind();
            if child.is_named() || !matches!(keyword, "indirect" | "class") {
                continue;
            }
            if keyword == "class" && node.kind() == "class_declaration" {
                continue;
            }
            modifiers.push(Modifier::named(keyword));
        }

        (attributes, modifiers)
    }

    /// `<T, U: Equatable>` -> generic parameters
    pub(crate) fn extract_generic_parameters(&self, node: &Node) -> Vec<GenericParameter> {
        let Some(type_parameters) = child_of_kind(node, &["type_parameters"]) else {
            return Vec::new();
        };

        children_of_kind(&type_parameters, &["type_parameter"])
            .iter()
            .filter_map(|parameter| parse_generic_parameter(&self.compact_text(parameter)))
            .collect()
    }

    /// Inherited types and conformances, in declaration order
    pub(crate) fn extract_inheritance(&self, node: &Node) -> Vec<String> {
        let specifiers = children_of_kind(node, &["inheritance_specifier"]);
        if !specifiers.is_empty() {
            return specifiers
                .iter()
                .map(|specifier| self.compact_text(specifier))
                .collect();
        }

        // Older grammar revisions group them in a clause
        if let Some(clause) = child_of_kind(node, &["type_inheritance_clause"]) {
            let text = self.compact_text(&clause);
            return split_top_level(text.trim_start_matches(':'), ',');
        }

        Vec::new()
    }

    /// `where` clauses, both trailing and inside the generic parameter list
    pub(crate) fn extract_generic_requirements(&self, node: &Node) -> Vec<GenericRequirement> {
        let mut constraint_nodes = children_of_kind(node, &["type_constraints"]);
        if let Some(type_parameters) = child_of_kind(node, &["type_parameters"]) {
            constraint_nodes.extend(children_of_kind(&type_parameters, &["type_constraints"]));
        }

        constraint_nodes
            .iter()
            .flat_map(|constraints| parse_generic_requirements(&self.compact_text(constraints)))
            .collect()
    }

    /// Parameters of a function, initializer or subscript
    ///
    /// The Swift parser places a parameter's attribute before it and its
    /// default value after it as siblings, so the list is rebuilt from the
    /// declaration's direct children.
    pub(crate) fn extract_parameters(&self, node: &Node) -> Vec<Parameter> {
        let mut parameters: Vec<Parameter> = Vec::new();
        let mut pending_attributes = Vec::new();

        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return parameters;
        }
        loop {
            let child = cursor.node();
            if cursor.field_name() == Some("default_value") {
                if let Some(last) = parameters.last_mut() {
                    last.default_value = Some(self.compact_text(&child));
                }
            } else if child.kind() == "attribute" {
                if let Some(attribute) = parse_attribute(&self.compact_text(&child)) {
                    pending_attributes.push(attribute);
                }
            } else if child.kind() == "parameter" {
                let mut parameter = self.extract_parameter(&child);
                parameter.attributes = std::mem::take(&mut pending_attributes);
                parameters.push(parameter);
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }

        parameters
    }

    fn extract_parameter(&self, node: &Node) -> Parameter {
        let mut names = Vec::new();
        let mut modifiers = Vec::new();
        let mut type_name = None;
        let mut variadic = false;
        let mut after_colon = false;

        // Labels and the type share the `name` field; the `:` separates them
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                match (cursor.field_name(), child.kind()) {
                    (Some("type"), _) => type_name = Some(self.compact_text(&child)),
                    (_, ":") => after_colon = true,
                    (_, "parameter_modifiers") | (_, "parameter_modifier") => {
                        modifiers.push(self.compact_text(&child))
                    }
                    (_, "...") => variadic = true,
                    (_, "simple_identifier") if !after_colon => names.push(self.text(&child)),
                    _ if after_colon && child.is_named() && type_name.is_none() => {
                        type_name = Some(self.compact_text(&child))
                    }
                    _ => {}
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        let type_name = type_name.map(|type_name| {
            if modifiers.is_empty() {
                type_name
            } else {
                format!("{} {}", modifiers.join(" "), type_name)
            }
        });

        let mut names = names.into_iter();
        Parameter {
            attributes: Vec::new(),
            first_name: names.next(),
            second_name: names.next(),
            type_name,
            variadic,
            default_value: None,
        }
    }

    /// `async` / `throws` effects written after the parameter list
    pub(crate) fn extract_effects(&self, node: &Node) -> (bool, Option<String>) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();

        // The effects sit between the closing parenthesis and the arrow or body
        let stop = children
            .iter()
            .position(|c| {
                matches!(
                    c.kind(),
                    "->" | "function_body" | "computed_property" | "type_constraints"
                )
            })
            .unwrap_or(children.len());
        let Some(close) = children[..stop].iter().rposition(|c| c.kind() == ")") else {
            return (false, None);
        };

        let mut is_async = false;
        let mut throws = None;
        for child in &children[close + 1..stop] {
            match child.kind() {
                "async" => is_async = true,
                "throws" | "rethrows" => throws = Some(self.compact_text(child)),
                _ => {}
            }
        }

        // Keywords the grammar keeps hidden only show up in the raw text
        let header_end = children
            .get(stop)
            .map(|c| c.start_byte())
            .unwrap_or_else(|| node.end_byte());
        let header = self
            .source
            .get(children[close].end_byte()..header_end)
            .unwrap_or("");
        let words: Vec<&str> = header
            .split(|c: char| c.is_whitespace() || c == '(')
            .collect();
        if words.contains(&"async") {
            is_async = true;
        }
        if throws.is_none() {
            throws = ["rethrows", "throws"]
                .into_iter()
                .find(|keyword| words.contains(keyword))
                .map(|keyword| keyword.to_string());
        }

        (is_async, throws)
    }

    pub(crate) fn extract_return_type(&self, node: &Node) -> Option<String> {
        node.child_by_field_name("return_type")
            .map(|return_type| self.compact_text(&return_type))
    }

    pub(crate) fn extract_function_signature(&self, node: &Node) -> FunctionSignature {
        let (is_async, throws) = self.extract_effects(node);
        FunctionSignature {
            input: self.extract_parameters(node),
            output: self.extract_return_type(node),
            is_async,
            throws,
        }
    }
}

/// `private(set)` -> Modifier { name: "private", detail: Some("set") }
pub(crate) fn parse_modifier(text: &str) -> Modifier {
    let text = text.trim();
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if open < close => Modifier {
            name: text[..open].trim().to_string(),
            detail: Some(text[open + 1..close].trim().to_string()),
        },
        _ => Modifier::named(text),
    }
}

/// `@available(iOS 13, *)` -> Attribute { name: "available", arguments: ["iOS 13", "*"] }
pub(crate) fn parse_attribute(text: &str) -> Option<Attribute> {
    let body = text.trim().strip_prefix('@')?.trim_start();
    if body.is_empty() {
        return None;
    }

    match (body.find('('), body.rfind(')')) {
        (Some(open), Some(close)) if open < close => Some(Attribute {
            name: body[..open].trim().to_string(),
            arguments: split_top_level(&body[open + 1..close], ','),
        }),
        _ => Some(Attribute {
            name: body.to_string(),
            arguments: Vec::new(),
        }),
    }
}

fn parse_generic_parameter(text: &str) -> Option<GenericParameter> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match find_top_level(text, ':') {
        Some(colon) => Some(GenericParameter {
            name: text[..colon].trim().to_string(),
            type_name: Some(text[colon + 1..].trim().to_string()),
        }),
        None => Some(GenericParameter {
            name: text.to_string(),
            type_name: None,
        }),
    }
}

/// Parse `where A: B, C == D` into requirements; unrecognized clauses are skipped
pub(crate) fn parse_generic_requirements(text: &str) -> Vec<GenericRequirement> {
    let text = text.trim();
    let text = text.strip_prefix("where").unwrap_or(text);

    split_top_level(text, ',')
        .into_iter()
        .filter_map(|clause| {
            if let Some(index) = clause.find("==") {
                return Some(GenericRequirement {
                    left_type: clause[..index].trim().to_string(),
                    relation: GenericRelation::SameType,
                    right_type: clause[index + 2..].trim().to_string(),
                });
            }
            find_top_level(&clause, ':').map(|index| GenericRequirement {
                left_type: clause[..index].trim().to_string(),
                relation: GenericRelation::Conformance,
                right_type: clause[index + 1..].trim().to_string(),
            })
        })
        .collect()
}

/// Byte index of the first `needle` not nested in brackets or string literals
pub(crate) fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut previous = '\0';

    for (index, c) in text.char_indices() {
        if in_string {
            if c == '"' && previous != '\\' {
                in_string = false;
            }
        } else if c == needle && depth == 0 {
            return Some(index);
        } else {
            match c {
                '"' => in_string = true,
                '(' | '[' | '{' | '<' => depth += 1,
                // `->` is an arrow, not a closing angle bracket
                '>' if previous == '-' => {}
                ')' | ']' | '}' | '>' => depth = (depth - 1).max(0),
                _ => {}
            }
        }
        previous = c;
    }

    None
}

/// Split on `separator` at nesting depth zero, trimming and dropping empty pieces
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text;

    while let Some(index) = find_top_level(rest, separator) {
        parts.push(rest[..index].trim().to_string());
        rest = &rest[index + separator.len_utf8()..];
    }
    parts.push(rest.trim().to_string());

    parts.retain(|part| !part.is_empty());
    parts
}

fn prefix(attributes: &[Attribute], modifiers: &[Modifier]) -> String {
    attributes
        .iter()
        .map(|a| a.to_string())
        .chain(modifiers.iter().map(|m| m.to_string()))
        .map(|part| format!("{} ", part))
        .collect()
}

fn generics(parameters: &[GenericParameter]) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
    format!("<{}>", rendered.join(", "))
}

fn inheritance(types: &[String]) -> String {
    if types.is_empty() {
        String::new()
    } else {
        format!(": {}", types.join(", "))
    }
}

fn requirements(requirements: &[GenericRequirement]) -> String {
    if requirements.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = requirements.iter().map(|r| r.to_string()).collect();
    format!(" where {}", rendered.join(", "))
}

fn parameters(parameters: &[Parameter]) -> String {
    let rendered: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
    format!("({})", rendered.join(", "))
}

fn effects(is_async: bool, throws: &Option<String>) -> String {
    let mut rendered = String::new();
    if is_async {
        rendered.push_str(" async");
    }
    if let Some(throws) = throws {
        rendered.push(' ');
        rendered.push_str(throws);
    }
    rendered
}

fn accessors(accessors: &[String]) -> String {
    if accessors.is_empty() {
        String::new()
    } else {
        format!(" {{ {} }}", accessors.join(" "))
    }
}

/// Render a declaration back to a single-line signature
pub(crate) fn render(declaration: &Declaration) -> String {
    match declaration {
        Declaration::Class(d) => format!(
            "{}{} {}{}{}{}",
            prefix(&d.attributes, &d.modifiers),
            d.keyword,
            d.name,
            generics(&d.generic_parameters),
            inheritance(&d.inheritance),
            requirements(&d.generic_requirements)
        ),
        Declaration::Structure(d) => format!(
            "{}{} {}{}{}{}",
            prefix(&d.attributes, &d.modifiers),
            d.keyword,
            d.name,
            generics(&d.generic_parameters),
            inheritance(&d.inheritance),
            requirements(&d.generic_requirements)
        ),
        Declaration::Enumeration(d) => format!(
            "{}{} {}{}{}{}",
            prefix(&d.attributes, &d.modifiers),
            d.keyword,
            d.name,
            generics(&d.generic_parameters),
            inheritance(&d.inheritance),
            requirements(&d.generic_requirements)
        ),
        Declaration::EnumerationCase(d) => {
            let mut rendered = format!("{}{} {}", prefix(&d.attributes, &d.modifiers), d.keyword, d.name);
            if let Some(associated_value) = &d.associated_value {
                rendered.push_str(&parameters(associated_value));
            }
            if let Some(raw_value) = &d.raw_value {
                rendered.push_str(&format!(" = {}", raw_value));
            }
            rendered
        }
        Declaration::Protocol(d) => format!(
            "{}{} {}{}{}",
            prefix(&d.attributes, &d.modifiers),
            d.keyword,
            d.name,
            inheritance(&d.inheritance),
            requirements(&d.generic_requirements)
        ),
        Declaration::Function(d) => {
            let mut rendered = format!(
                "{}{} {}{}{}{}",
                prefix(&d.attributes, &d.modifiers),
                d.keyword,
                d.name,
                generics(&d.generic_parameters),
                parameters(&d.signature.input),
                effects(d.signature.is_async, &d.signature.throws)
            );
            if let Some(output) = &d.signature.output {
                rendered.push_str(&format!(" -> {}", output));
            }
            rendered.push_str(&requirements(&d.generic_requirements));
            rendered
        }
        Declaration::Initializer(d) => format!(
            "{}{}{}{}{}{}{}",
            prefix(&d.attributes, &d.modifiers),
            d.keyword,
            d.optional.as_deref().unwrap_or(""),
            generics(&d.generic_parameters),
            parameters(&d.parameters),
            effects(d.is_async, &d.throws),
            requirements(&d.generic_requirements)
        ),
        Declaration::Subscript(d) => {
            let mut rendered = format!(
                "{}{}{}{}",
                prefix(&d.attributes, &d.modifiers),
                d.keyword,
                generics(&d.generic_parameters),
                parameters(&d.indices)
            );
            if let Some(return_type) = &d.return_type {
                rendered.push_str(&format!(" -> {}", return_type));
            }
            rendered.push_str(&requirements(&d.generic_requirements));
            rendered.push_str(&accessors(&d.accessors));
            rendered
        }
        Declaration::Variable(d) => {
            let mut rendered = format!("{}{} {}", prefix(&d.attributes, &d.modifiers), d.keyword, d.name);
            if let Some(type_annotation) = &d.type_annotation {
                rendered.push_str(&format!(": {}", type_annotation));
            }
            if let Some(value) = &d.initialized_value {
                rendered.push_str(&format!(" = {}", value));
            }
            rendered.push_str(&accessors(&d.accessors));
            rendered
        }
        Declaration::Typealias(d) => {
            let mut rendered = format!(
                "{}{} {}{}",
                prefix(&d.attributes, &d.modifiers),
                d.keyword,
                d.name,
                generics(&d.generic_parameters)
            );
            if let Some(initialized_type) = &d.initialized_type {
                rendered.push_str(&format!(" = {}", initialized_type));
            }
            rendered
        }
        Declaration::AssociatedType(d) => {
            let mut rendered = format!(
                "{}{} {}{}",
                prefix(&d.attributes, &d.modifiers),
                d.keyword,
                d.name,
                inheritance(&d.inheritance)
            );
            if let Some(default_type) = &d.default_type {
                rendered.push_str(&format!(" = {}", default_type));
            }
            rendered.push_str(&requirements(&d.generic_requirements));
            rendered
        }
        Declaration::PrecedenceGroup(d) => {
            format!("{}{} {}", prefix(&d.attributes, &d.modifiers), d.keyword, d.name)
        }
    }
}
