// Swift Markup parser
//
// Two passes: strip the comment delimiters (`///`, `/** */` and the ` * `
// margin), then read the remaining Markdown-like text for the summary,
// discussion and the `- Keyword:` fields.

use regex::Regex;
use std::sync::LazyLock;

use super::{Callout, Documentation, DocumentationError, DocumentationParser, ParameterDoc};

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)[-*+][ \t]+(?P<label>[A-Za-z][A-Za-z0-9_ \t]*?)[ \t]*:[ \t]*(?P<body>.*)$")
        .unwrap()
});

/// Default documentation parser for Swift Markup
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupParser;

impl DocumentationParser for MarkupParser {
    fn parse(&self, raw: &str) -> Result<Documentation, DocumentationError> {
        let lines = strip_comment_markers(raw)?;
        let documentation = parse_markup(&lines);
        if documentation.is_empty() {
            return Err(DocumentationError::Empty);
        }
        Ok(documentation)
    }
}

/// Remove comment delimiters, returning the dedented body lines
fn strip_comment_markers(raw: &str) -> Result<Vec<String>, DocumentationError> {
    let mut lines = Vec::new();
    let mut block: Option<Vec<String>> = None;

    for line in raw.lines() {
        if let Some(body) = block.as_mut() {
            match line.find("*/") {
                Some(end) => {
                    body.push(line[..end].to_string());
                    lines.extend(strip_block_margin(body));
                    block = None;
                }
                None => body.push(line.to_string()),
            }
            continue;
        }

        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("///") {
            if rest.starts_with('/') {
                return Err(DocumentationError::NotDocumentation);
            }
            lines.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        } else if let Some(rest) = trimmed.strip_prefix("/**") {
            match rest.find("*/") {
                Some(end) => lines.push(rest[..end].trim().to_string()),
                None => block = Some(vec![rest.to_string()]),
            }
        } else if !trimmed.is_empty() {
            return Err(DocumentationError::NotDocumentation);
        }
    }

    // Unterminated block: keep what was collected
    if let Some(body) = block {
        lines.extend(strip_block_margin(&body));
    }

    Ok(dedent(lines))
}

/// Drop the ` * ` margin when every non-blank line of a block carries one
fn strip_block_margin(body: &[String]) -> Vec<String> {
    let has_margin = body
        .iter()
        .filter(|line| !line.trim().is_empty())
        .all(|line| line.trim_start().starts_with('*'));

    body.iter()
        .map(|line| {
            if has_margin {
                let rest = line.trim_start().trim_start_matches('*');
                rest.strip_prefix(' ').unwrap_or(rest).to_string()
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Leading ASCII spaces and tabs; other whitespace counts as text so that
/// slicing at the width stays on a char boundary
fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn dedent(lines: Vec<String>) -> Vec<String> {
    let common = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    let mut lines: Vec<String> = lines
        .into_iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                line[common..].trim_end().to_string()
            }
        })
        .collect();

    while lines.first().is_some_and(|line| line.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

#[derive(Debug)]
enum Field<'a> {
    Parameters,
    Parameter(&'a str),
    Returns,
    Throws,
    Callout(&'a str),
}

fn classify(label: &str) -> Option<Field<'_>> {
    let words: Vec<&str> = label.split_whitespace().collect();
    match words.as_slice() {
        [word] if word.eq_ignore_ascii_case("parameters") => Some(Field::Parameters),
        [word, name] if word.eq_ignore_ascii_case("parameter") => Some(Field::Parameter(*name)),
        [word] if word.eq_ignore_ascii_case("returns") || word.eq_ignore_ascii_case("return") => {
            Some(Field::Returns)
        }
        [word] if word.eq_ignore_ascii_case("throws") => Some(Field::Throws),
        [word] => Some(Field::Callout(*word)),
        _ => None,
    }
}

/// Where continuation lines of the current field go
#[derive(Debug, Clone, Copy)]
enum Target {
    Parameter(usize),
    Returns,
    Throws,
    Callout(usize),
}

enum Paragraph {
    Prose(String),
    Code(String),
}

#[derive(Default)]
struct MarkupReader {
    documentation: Documentation,
    paragraphs: Vec<Paragraph>,
    prose: Vec<String>,
    /// Field receiving continuation lines, with its bullet indent
    target: Option<(Target, usize)>,
    /// Bullet indent of an open `- Parameters:` list
    parameter_list: Option<usize>,
}

impl MarkupReader {
    fn flush_prose(&mut self) {
        if !self.prose.is_empty() {
            self.paragraphs.push(Paragraph::Prose(self.prose.join(" ")));
            self.prose.clear();
        }
    }

    fn append(&mut self, target: Target, text: &str) {
        let slot = match target {
            Target::Parameter(index) => &mut self.documentation.parameters[index].description,
            Target::Callout(index) => &mut self.documentation.callouts[index].content,
            Target::Returns => self.documentation.returns.get_or_insert_with(String::new),
            Target::Throws => self.documentation.throws.get_or_insert_with(String::new),
        };
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(text.trim());
    }

    fn start_parameter(&mut self, name: &str, description: &str, indent: usize) {
        self.documentation.parameters.push(ParameterDoc {
            name: name.to_string(),
            description: description.to_string(),
        });
        let index = self.documentation.parameters.len() - 1;
        self.target = Some((Target::Parameter(index), indent));
    }

    /// Handle a `- Label: body` bullet; false when it is ordinary text
    fn field(&mut self, indent: usize, label: &str, body: &str) -> bool {
        if let Some(list_indent) = self.parameter_list {
            if indent > list_indent {
                self.flush_prose();
                self.start_parameter(label, body, indent);
                return true;
            }
            self.parameter_list = None;
        }

        let Some(field) = classify(label) else {
            return false;
        };
        self.flush_prose();

        match field {
            Field::Parameters => {
                self.parameter_list = Some(indent);
                self.target = None;
            }
            Field::Parameter(name) => self.start_parameter(name, body, indent),
            Field::Returns => {
                self.documentation.returns = Some(String::new());
                self.append(Target::Returns, body);
                self.target = Some((Target::Returns, indent));
            }
            Field::Throws => {
                self.documentation.throws = Some(String::new());
                self.append(Target::Throws, body);
                self.target = Some((Target::Throws, indent));
            }
            Field::Callout(delimiter) => {
                self.documentation.callouts.push(Callout {
                    delimiter: delimiter.to_string(),
                    content: body.to_string(),
                });
                let index = self.documentation.callouts.len() - 1;
                self.target = Some((Target::Callout(index), indent));
            }
        }
        true
    }

    fn line(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.flush_prose();
            self.target = None;
            return;
        }

        if let Some(captures) = FIELD_RE.captures(line) {
            let indent = captures["indent"].len();
            if self.field(indent, &captures["label"], captures["body"].trim()) {
                return;
            }
        }

        let indent = indent_width(line);
        if let Some((target, field_indent)) = self.target {
            if indent > field_indent {
                self.append(target, line);
                return;
            }
            self.target = None;
        }
        if self.parameter_list.is_some_and(|list_indent| indent <= list_indent) {
            self.parameter_list = None;
        }

        self.prose.push(line.trim().to_string());
    }

    fn finish(mut self) -> Documentation {
        self.flush_prose();

        let mut paragraphs = self.paragraphs.into_iter().peekable();
        if let Some(Paragraph::Prose(_)) = paragraphs.peek() {
            if let Some(Paragraph::Prose(summary)) = paragraphs.next() {
                self.documentation.summary = Some(summary);
            }
        }
        self.documentation.discussion = paragraphs
            .map(|paragraph| match paragraph {
                Paragraph::Prose(text) | Paragraph::Code(text) => text,
            })
            .collect();

        self.documentation
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn parse_markup(lines: &[String]) -> Documentation {
    let mut reader = MarkupReader::default();
    let mut code: Option<Vec<&str>> = None;

    for line in lines {
        if let Some(block) = code.as_mut() {
            block.push(line);
            if is_fence(line) {
                reader.paragraphs.push(Paragraph::Code(block.join("\n")));
                code = None;
            }
            continue;
        }

        if is_fence(line) {
            reader.flush_prose();
            reader.target = None;
            code = Some(vec![line]);
            continue;
        }

        reader.line(line);
    }

    // Unclosed fence runs to the end of the comment
    if let Some(block) = code {
        reader.paragraphs.push(Paragraph::Code(block.join("\n")));
    }

    reader.finish()
}
