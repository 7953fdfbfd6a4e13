//! `runcmd run`: prepare the script, then execute it.

use std::path::{Path, PathBuf};

use runcmd_core::HandlerSettings;
use runcmd_download::{materialize, save_script_file};
use runcmd_runtime::{ExecutionResult, Invocation, exec_in_directory};
use tracing::info;

use crate::bootstrap::CliConfig;
use crate::error::CliError;

/// File name an inline script is saved under.
pub const INLINE_SCRIPT_FILE: &str = "script.sh";

/// Load `settings_path`, put the script in the working directory and run it.
///
/// The artifact is fully written and closed before execution starts.
pub async fn execute(config: &CliConfig, settings_path: &Path) -> Result<ExecutionResult, CliError> {
    let settings = HandlerSettings::load(settings_path)?;
    tokio::fs::create_dir_all(&config.work_dir).await?;

    let script = prepare_script(config, &settings).await?;

    let invocation = Invocation::new(&script, &settings.parameters());
    let result = exec_in_directory(
        &config.executor,
        &invocation,
        &config.work_dir,
        &settings.execution_settings(),
    )
    .await?;

    info!(
        script = %script.display(),
        exit_code = result.exit_code,
        "run completed"
    );
    Ok(result)
}

/// Save the inline script or download the script URI.
async fn prepare_script(config: &CliConfig, settings: &HandlerSettings) -> Result<PathBuf, CliError> {
    if let Some(content) = settings.script() {
        let path = config.work_dir.join(INLINE_SCRIPT_FILE);
        save_script_file(&path, content).await?;
        return Ok(path);
    }

    // Validation guarantees a script URI when there is no inline script
    let uri = settings
        .script_uri()
        .ok_or(runcmd_core::SettingsError::MissingSource)?;
    let downloader = config.selector(settings.storage_account())?.select(uri)?;
    materialize(&downloader, &config.work_dir)
        .await
        .map_err(CliError::from)
}
