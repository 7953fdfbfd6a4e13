//! Destination file name derivation.

use url::Url;

use crate::error::{DownloadError, DownloadResult};

/// Derive a file name from the last path segment of `source`.
///
/// Query and fragment are ignored. The last segment must be non-empty, so
/// `http://host/dir/` has no file name while `http://host/a///b` yields `b`.
/// Percent-encoded segments are decoded; names that would escape the
/// destination directory are rejected.
pub fn url_to_file_name(source: &str) -> DownloadResult<String> {
    let url = Url::parse(source).map_err(|e| DownloadError::UrlParse {
        url: source.to_string(),
        source: e,
    })?;

    let no_file_name = || DownloadError::NoFileName {
        url: source.to_string(),
    };

    let segment = url
        .path_segments()
        .and_then(Iterator::last)
        .filter(|s| !s.is_empty())
        .ok_or_else(no_file_name)?;

    let name = urlencoding::decode(segment).map_err(|_| no_file_name())?;
    if name == "." || name == ".." || name.contains(['/', '\0']) {
        return Err(no_file_name());
    }

    Ok(name.into_owned())
}
