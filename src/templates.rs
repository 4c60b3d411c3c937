//! Message body templates
//!
//! Bodies use `{field}` placeholders with `{{` and `}}` as literal braces,
//! the same syntax users already write in the settings page. Rendering is
//! strict: a placeholder that names a field the caller did not supply is an
//! error rather than being left in the text.

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse a template, rejecting unbalanced braces and unsupported field forms
    pub fn parse(source: &str) -> AppResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }

                    let mut name = String::new();
                    let mut closed = false;
                    for (inner_offset, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(AppError::TemplateSyntax {
                                    offset: inner_offset,
                                    reason: "unexpected '{' inside field".to_string(),
                                });
                            }
                            other => name.push(other),
                        }
                    }

                    if !closed {
                        return Err(AppError::TemplateSyntax {
                            offset,
                            reason: "unclosed '{'".to_string(),
                        });
                    }
                    if name.trim().is_empty() {
                        return Err(AppError::TemplateSyntax {
                            offset,
                            reason: "positional fields are not supported".to_string(),
                        });
                    }
                    if name.contains(':') || name.contains('!') {
                        return Err(AppError::TemplateSyntax {
                            offset,
                            reason: format!("format specification in '{{{name}}}' is not supported"),
                        });
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(AppError::TemplateSyntax {
                            offset,
                            reason: "single '}' encountered".to_string(),
                        });
                    }
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Substitute every placeholder from `values`
    pub fn render(&self, values: &[(&str, &str)]) -> AppResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value = values
                        .iter()
                        .find(|(key, _)| *key == name.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| AppError::TemplateUnknownField { field: name.clone() })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
