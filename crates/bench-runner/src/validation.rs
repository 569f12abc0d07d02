//! Template validation before a query run.

use crate::connection::Connection;
use crate::dialect::Dialect;
use bench_core::QueryFields;
use query_templates::{TemplateCatalog, TemplateError};
use tracing::{debug, info};

/// Render every template of `catalog` with `sample`.
pub fn validate_templates(
    catalog: &TemplateCatalog,
    sample: &QueryFields,
) -> Result<(), TemplateError> {
    catalog.validate(sample)?;
    info!(count = catalog.len(), "Validated query templates");
    Ok(())
}

/// Render and execute every template once, discarding the rows.
///
/// Catches statements the target dialect rejects before any timed work starts.
pub async fn validate_templates_live(
    connection: &mut dyn Connection,
    dialect: &dyn Dialect,
    catalog: &TemplateCatalog,
    sample: &QueryFields,
) -> Result<(), TemplateError> {
    for template in catalog.templates() {
        let statement = dialect.render_query(template, sample)?;
        let rows = connection
            .query(&statement)
            .await
            .map_err(|e| TemplateError::Rejected {
                template: template.name().to_string(),
                message: e.to_string(),
            })?;
        debug!(template = template.name(), rows, "Live template validation passed");
    }
    info!(count = catalog.len(), "Validated query templates against the database");
    Ok(())
}
