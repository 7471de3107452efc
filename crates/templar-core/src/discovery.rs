use std::path::{Path, PathBuf};

/// List the immediate subdirectories of `root`.
///
/// Symlinks are followed. Non-directory entries are skipped silently. The
/// result is sorted by path so runs log in a stable order.
///
/// # Errors
///
/// [`Error::Discovery`](crate::Error::Discovery) if `root` cannot be read,
/// [`Error::DiscoveryStat`](crate::Error::DiscoveryStat) if an entry cannot
/// be stat'ed (a dangling symlink, for example).
pub fn discover_templates(root: &Path) -> crate::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root).map_err(|e| crate::Error::Discovery {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| crate::Error::Discovery {
            path: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        let meta = std::fs::metadata(&path).map_err(|e| crate::Error::DiscoveryStat {
            path: path.clone(),
            source: e,
        })?;
        if meta.is_dir() {
            dirs.push(path);
        } else {
            tracing::debug!(path = %path.display(), "skipping non-directory entry");
        }
    }

    dirs.sort();
    tracing::debug!(root = %root.display(), count = dirs.len(), "templates discovered");
    Ok(dirs)
}
