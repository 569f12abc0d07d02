//! Error types for template handling.

use bench_core::{DbTarget, Field};
use thiserror::Error;

/// Errors that can occur while loading, validating or rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Error reading the template file
    #[error("Failed to read template file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing the YAML catalog
    #[error("Failed to parse template YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The catalog contains no templates
    #[error("Template catalog contains no queries")]
    Empty,

    /// Two templates share a name
    #[error("Duplicate template name: {0}")]
    DuplicateName(String),

    /// A template has no SQL for the selected database
    #[error("Template '{template}' has no SQL for {target}")]
    MissingDialect { template: String, target: DbTarget },

    /// A placeholder names something outside the field vocabulary
    #[error("Template '{template}' references undefined field '{field}'")]
    UnknownField { template: String, field: String },

    /// A placeholder is opened but never closed
    #[error("Template '{template}' has an unterminated placeholder at byte {offset}")]
    Unterminated { template: String, offset: usize },

    /// The record being rendered does not provide a referenced field
    #[error("Template '{template}' requires field '{field}', which was not provided")]
    MissingField { template: String, field: Field },

    /// No template with the requested name
    #[error("Template not found: {0}")]
    NotFound(String),

    /// The database rejected a template during live validation
    #[error("Template '{template}' failed against the database: {message}")]
    Rejected { template: String, message: String },
}
