//! Line-ending normalization of saved artifacts.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Rewrite `path` with every CR that precedes an LF removed.
///
/// A run of CRs before an LF is removed entirely, so the pass is idempotent.
/// Lone CRs and LFs are kept. The file is replaced atomically through a
/// temporary file in the same directory and keeps its permissions, which
/// lets it work on files that are no longer writable.
///
/// Returns whether the content changed.
pub fn normalize_line_endings(path: &Path) -> io::Result<bool> {
    let content = fs::read(path)?;
    let normalized = strip_carriage_returns(&content);
    if normalized.len() == content.len() {
        return Ok(false);
    }

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&normalized)?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(true)
}

fn strip_carriage_returns(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    for &byte in content {
        if byte == b'\n' {
            while out.last() == Some(&b'\r') {
                out.pop();
            }
        }
        out.push(byte);
    }
    out
}
