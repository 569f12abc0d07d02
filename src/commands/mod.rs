//! Command handlers.

pub mod insert;
pub mod query;
pub mod seed;
pub mod validate;

use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancel the run once `limit` has elapsed.
pub(crate) fn arm_deadline(cancel: &CancellationToken, limit: Option<Duration>) {
    if let Some(limit) = limit {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(limit) => {
                    warn!(limit = ?limit, "Maximum run duration reached, stopping");
                    cancel.cancel();
                }
            }
        });
    }
}

pub(crate) fn create_result_log(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create result log: {}", path.display()))?;
    info!(path = %path.display(), "Writing results");
    Ok(BufWriter::new(file))
}

pub(crate) fn finish_result_log(mut writer: BufWriter<File>, path: &Path) -> anyhow::Result<()> {
    writer
        .flush()
        .with_context(|| format!("Failed to flush result log: {}", path.display()))
}
