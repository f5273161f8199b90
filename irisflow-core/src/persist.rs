//! Atomic file writes shared by the catalog and the tracking store.

use std::io;
use std::path::Path;

/// Write raw bytes through a `.tmp` sibling, then rename onto the target.
///
/// The rename makes the write all-or-nothing: readers never observe a
/// half-written artifact. Parent directories are created as needed.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Serialize `data` to pretty-printed JSON and write it atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
    atomic_write(path, json.as_bytes())
}
