//! Writing downloads to disk as executable artifacts.
//!
//! An artifact is streamed to `<dest_dir>/<file name>`, normalized and then
//! made read+execute for its owner only. The download is fully written and
//! closed before this module returns the path, so execution never overlaps
//! with the transfer.

mod file_name;
mod normalize;

use std::collections::HashMap;
use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use futures_util::future::try_join_all;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::downloader::{BodyStream, Downloader, download};
use crate::error::{DownloadError, DownloadResult};

pub use file_name::url_to_file_name;
pub use normalize::normalize_line_endings;

/// Mode of a saved artifact: read and execute for the owner only.
pub const ARTIFACT_MODE: u32 = 0o500;

/// Download one artifact into `dest_dir` and return its path.
///
/// On failure a partially written file may remain; callers that need a
/// clean directory should remove it.
pub async fn materialize(downloader: &Downloader, dest_dir: &Path) -> DownloadResult<PathBuf> {
    let file_name = downloader.file_name()?;
    let path = dest_dir.join(&file_name);

    fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| DownloadError::io(dest_dir, e))?;

    info!(source = %downloader.describe(), kind = downloader.kind(), path = %path.display(), "downloading artifact");
    let outcome = download(downloader).await?;
    let written = write_body(outcome.body, &path).await?;

    finish_artifact(&path).await?;

    info!(path = %path.display(), bytes = written, "artifact saved");
    Ok(path)
}

/// Download several artifacts into `dest_dir` concurrently.
///
/// Paths are returned in input order. Fails before downloading anything if
/// two sources would be saved under the same name.
pub async fn materialize_all(
    downloaders: &[Downloader],
    dest_dir: &Path,
) -> DownloadResult<Vec<PathBuf>> {
    let mut seen: HashMap<String, String> = HashMap::new();
    for downloader in downloaders {
        let name = downloader.file_name()?;
        if let Some(first) = seen.get(&name) {
            return Err(DownloadError::DuplicateFileName {
                name,
                first: first.clone(),
                second: downloader.describe(),
            });
        }
        seen.insert(name, downloader.describe());
    }

    try_join_all(downloaders.iter().map(|d| materialize(d, dest_dir))).await
}

/// Save inline script content to `path` as an artifact.
pub async fn save_script_file(path: &Path, content: &str) -> DownloadResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DownloadError::io(parent, e))?;
    }

    remove_stale(path).await?;
    fs::write(path, content)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    finish_artifact(path).await?;
    debug!(path = %path.display(), bytes = content.len(), "script saved");
    Ok(())
}

/// Stream `body` into a fresh file at `path`. The body is dropped on return.
async fn write_body(mut body: BodyStream, path: &Path) -> DownloadResult<u64> {
    remove_stale(path).await?;
    let mut file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let mut written: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| DownloadError::io(path, e))?;
    file.sync_all().await.map_err(|e| DownloadError::io(path, e))?;
    Ok(written)
}

/// Normalize line endings, then lock the file down to [`ARTIFACT_MODE`].
async fn finish_artifact(path: &Path) -> DownloadResult<()> {
    let owned = path.to_path_buf();
    let changed = tokio::task::spawn_blocking(move || normalize_line_endings(&owned))
        .await
        .map_err(|e| DownloadError::io(path, std::io::Error::other(e)))?
        .map_err(|e| DownloadError::io(path, e))?;
    if changed {
        debug!(path = %path.display(), "normalized line endings");
    }

    fs::set_permissions(path, Permissions::from_mode(ARTIFACT_MODE))
        .await
        .map_err(|e| DownloadError::io(path, e))
}

/// A previous artifact is read-only; replace it rather than open it for writing.
async fn remove_stale(path: &Path) -> DownloadResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DownloadError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");

        save_script_file(&path, "echo").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "echo");

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, ARTIFACT_MODE);
    }

    #[tokio::test]
    async fn test_save_script_file_replaces_read_only_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");

        save_script_file(&path, "echo one\r\n").await.unwrap();
        save_script_file(&path, "echo two\r\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "echo two\n");
    }

    #[tokio::test]
    async fn test_materialize_all_rejects_duplicate_names() {
        let client = reqwest::Client::new();
        let downloaders = vec![
            Downloader::Url(
                crate::UrlDownloader::new(client.clone(), "http://127.0.0.1:1/a/run.sh").unwrap(),
            ),
            Downloader::Url(
                crate::UrlDownloader::new(client, "http://127.0.0.1:1/b/run.sh").unwrap(),
            ),
        ];
        let dir = tempfile::tempdir().unwrap();

        let err = materialize_all(&downloaders, dir.path()).await.unwrap_err();
        assert!(matches!(err, DownloadError::DuplicateFileName { ref name, .. } if name == "run.sh"));
    }
}
