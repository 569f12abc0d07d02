//! YAML template catalogs.

use crate::error::TemplateError;
use crate::template::QueryTemplate;
use bench_core::{DbTarget, QueryFields};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One query definition as written in the YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cratedb_sql: Option<String>,
    #[serde(default)]
    pub mobilitydb_sql: Option<String>,
}

impl QueryDefinition {
    fn sql_for(&self, target: DbTarget) -> Option<&str> {
        match target {
            DbTarget::CrateDb => self.cratedb_sql.as_deref(),
            DbTarget::MobilityDb => self.mobilitydb_sql.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    queries: Vec<QueryDefinition>,
}

/// Parsed templates for one target database, in file order.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    target: DbTarget,
    templates: Vec<QueryTemplate>,
}

impl TemplateCatalog {
    /// Build a catalog from already parsed templates.
    pub fn new(target: DbTarget, templates: Vec<QueryTemplate>) -> Result<Self, TemplateError> {
        if templates.is_empty() {
            return Err(TemplateError::Empty);
        }
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.name()) {
                return Err(TemplateError::DuplicateName(template.name().to_string()));
            }
        }
        Ok(Self { target, templates })
    }

    /// Parse a YAML catalog, keeping the SQL for `target`.
    pub fn from_yaml_str(yaml: &str, target: DbTarget) -> Result<Self, TemplateError> {
        let raw: RawCatalog = serde_yaml::from_str(yaml)?;

        let templates = raw
            .queries
            .into_iter()
            .map(|definition| {
                let sql = definition.sql_for(target).ok_or_else(|| {
                    TemplateError::MissingDialect {
                        template: definition.name.clone(),
                        target,
                    }
                })?;
                let template = QueryTemplate::parse(definition.name.clone(), sql)?
                    .with_description(definition.description);
                debug!(template = template.name(), %target, "Parsed query template");
                Ok(template)
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;

        Self::new(target, templates)
    }

    /// Load a YAML catalog from a file.
    pub fn from_file<P: AsRef<Path>>(path: P, target: DbTarget) -> Result<Self, TemplateError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content, target)
    }

    pub fn target(&self) -> DbTarget {
        self.target
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in catalog order.
    pub fn templates(&self) -> &[QueryTemplate] {
        &self.templates
    }

    /// Template names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name()).collect()
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Result<&QueryTemplate, TemplateError> {
        self.templates
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Template used for the query with the given index (round-robin).
    pub fn for_index(&self, query_index: u64) -> &QueryTemplate {
        let slot = (query_index % self.templates.len() as u64) as usize;
        &self.templates[slot]
    }

    /// Render every template against `sample`, failing on the first error.
    pub fn validate(&self, sample: &QueryFields) -> Result<(), TemplateError> {
        for template in &self.templates {
            template.render(sample)?;
            debug!(template = template.name(), "Template validation passed");
        }
        Ok(())
    }
}
