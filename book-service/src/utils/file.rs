use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_BOOKS_FILE: &str = "data.json";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Sibling path used to stage a rewrite of `path` before renaming it into place.
/// Unique per call so overlapping writers never share a staging file.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_BOOKS_FILE.into());
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    name.push(format!(".{}.{}.tmp", std::process::id(), seq));
    path.with_file_name(name)
}
