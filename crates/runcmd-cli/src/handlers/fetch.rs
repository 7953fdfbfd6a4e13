//! `runcmd fetch`: download artifacts without running them.

use std::path::PathBuf;

use runcmd_download::materialize_all;
use tracing::info;

use crate::bootstrap::CliConfig;
use crate::error::CliError;

/// Download `sources` into the working directory, returning the saved paths
/// in source order.
pub async fn execute(config: &CliConfig, sources: &[String]) -> Result<Vec<PathBuf>, CliError> {
    let downloaders = config.selector(None)?.select_all(sources)?;
    let paths = materialize_all(&downloaders, &config.work_dir).await?;

    info!(count = paths.len(), work_dir = %config.work_dir.display(), "fetch completed");
    Ok(paths)
}
