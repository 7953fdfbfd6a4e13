//! Output capture to fixed files in the working directory.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use runcmd_core::ExecutionSettings;

use crate::error::{ExecError, ExecResult};
use crate::executor::{CommandExecutor, ExecutionResult, Invocation};

/// Name of the file that receives the child's stdout.
pub const STDOUT_FILE: &str = "stdout";

/// Name of the file that receives the child's stderr.
pub const STDERR_FILE: &str = "stderr";

/// Paths of the stdout and stderr files for `dir`. Nothing is created.
pub fn log_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join(STDOUT_FILE), dir.join(STDERR_FILE))
}

/// Run `invocation` in `work_dir`, capturing output to `work_dir/stdout`
/// and `work_dir/stderr`.
///
/// Both files are truncated first and created with mode 0600 when missing.
pub async fn exec_in_directory(
    executor: &CommandExecutor,
    invocation: &Invocation,
    work_dir: &Path,
    settings: &ExecutionSettings,
) -> ExecResult<ExecutionResult> {
    let (stdout_path, stderr_path) = log_paths(work_dir);
    let stdout = open_output(&stdout_path)?;
    let stderr = open_output(&stderr_path)?;

    executor
        .run(invocation, work_dir, stdout, stderr, settings)
        .await
}

fn open_output(path: &Path) -> ExecResult<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(|source| ExecError::Output {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_log_paths() {
        let (stdout, stderr) = log_paths(Path::new("/var/lib/runcmd/0"));
        assert_eq!(stdout, Path::new("/var/lib/runcmd/0/stdout"));
        assert_eq!(stderr, Path::new("/var/lib/runcmd/0/stderr"));
    }

    #[test]
    fn test_open_output_creates_private_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STDOUT_FILE);

        drop(open_output(&path).unwrap());

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_open_output_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STDERR_FILE);
        std::fs::write(&path, "previous run").unwrap();

        drop(open_output(&path).unwrap());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_open_output_in_missing_dir() {
        let err = open_output(Path::new("/nonexistent/dir/stdout")).unwrap_err();
        assert!(matches!(err, ExecError::Output { .. }));
        assert_eq!(err.exit_code(), None);
    }
}
