// TextureCatalog - platform/fs.rs
//
// Filesystem helpers shared by the store and the CLI export paths.

use crate::util::constants::TEMP_FILE_SUFFIX;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling temp path used while `path` is being replaced.
///
/// `products.json` becomes `products.json.tmp`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(TEMP_FILE_SUFFIX);
    path.with_file_name(name)
}

/// Replace `path` with `bytes` atomically (write temp, then rename).
///
/// Creates parent directories as needed. A crash or error between the write
/// and the rename loses the new content but never truncates the previous
/// file. The temp file is removed when the write or rename fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let result = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(e) = result {
        // Ignore any secondary error; the first failure is what matters.
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "File written atomically");
    Ok(())
}
