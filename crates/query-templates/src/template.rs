//! Parsed query templates and rendering.

use crate::error::TemplateError;
use bench_core::{Field, QueryFields};
use std::collections::HashMap;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Source of field values for rendering.
pub trait FieldValues {
    /// Text for `field`, or `None` when the record does not carry it.
    fn field_value(&self, field: Field) -> Option<String>;
}

impl FieldValues for QueryFields {
    fn field_value(&self, field: Field) -> Option<String> {
        Some(self.value(field))
    }
}

impl FieldValues for HashMap<Field, String> {
    fn field_value(&self, field: Field) -> Option<String> {
        self.get(&field).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(Field),
}

/// A named query template, parsed into literal text and placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTemplate {
    name: String,
    description: Option<String>,
    text: String,
    segments: Vec<Segment>,
}

impl QueryTemplate {
    /// Parse template text.
    ///
    /// Placeholders are `{{Name}}`; surrounding whitespace and a leading `.`
    /// (`{{ .Name }}`) are accepted.
    pub fn parse(name: impl Into<String>, text: impl Into<String>) -> Result<Self, TemplateError> {
        let name = name.into();
        let text = text.into();
        let mut segments = Vec::new();
        let mut rest = text.as_str();
        let mut consumed = 0;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or_else(|| TemplateError::Unterminated {
                    template: name.clone(),
                    offset: consumed + start,
                })?;

            let raw = after_open[..end].trim();
            let key = raw.strip_prefix('.').unwrap_or(raw);
            let field = key.parse::<Field>().map_err(|_| TemplateError::UnknownField {
                template: name.clone(),
                field: raw.to_string(),
            })?;
            segments.push(Segment::Placeholder(field));

            let advance = start + OPEN.len() + end + CLOSE.len();
            consumed += advance;
            rest = &rest[advance..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            name,
            description: None,
            text,
            segments,
        })
    }

    /// Attach a human readable description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The unparsed template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fields referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(field) => Some(*field),
            Segment::Literal(_) => None,
        })
    }

    /// Render the template, substituting every placeholder.
    pub fn render<V: FieldValues + ?Sized>(&self, values: &V) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.text.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(field) => {
                    let value =
                        values
                            .field_value(*field)
                            .ok_or_else(|| TemplateError::MissingField {
                                template: self.name.clone(),
                                field: *field,
                            })?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}
