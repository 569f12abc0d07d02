//! Template validation command.

use crate::DbOpts;
use anyhow::Context;
use bench_core::QueryFields;
use bench_runner::{dialect_for, validate_templates, validate_templates_live, Connector, PgConnector};
use clap::Parser;
use query_templates::TemplateCatalog;
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub db: DbOpts,

    /// YAML query template catalog
    #[arg(long, env = "BENCH_TEMPLATES")]
    pub templates: PathBuf,

    /// Also execute every template against the database
    #[arg(long)]
    pub validate_live: bool,
}

/// Check that every template renders, and optionally that the database accepts it.
pub async fn run_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let target = args.db.target();
    let catalog = TemplateCatalog::from_file(&args.templates, target).with_context(|| {
        format!("Failed to load templates: {}", args.templates.display())
    })?;
    let sample = QueryFields::sample();

    validate_templates(&catalog, &sample)?;
    if args.validate_live {
        let connector = PgConnector::new(args.db.connection_string());
        let mut connection = connector.connect().await?;
        validate_templates_live(
            connection.as_mut(),
            dialect_for(target).as_ref(),
            &catalog,
            &sample,
        )
        .await?;
    }

    for template in catalog.templates() {
        let fields: Vec<String> = template.fields().map(|f| f.to_string()).collect();
        println!("{}: {}", template.name(), fields.join(", "));
    }
    Ok(())
}
