//! Atomic JSON writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use canon_model::{CanonError, Result};

/// Temp file that is deleted on drop unless it was renamed into place.
struct TempFile {
    path: PathBuf,
    committed: bool,
}

impl TempFile {
    fn for_target(target: &Path) -> Self {
        let mut name = target.as_os_str().to_owned();
        name.push(".tmp");
        Self {
            path: PathBuf::from(name),
            committed: false,
        }
    }

    fn commit(mut self, target: &Path) -> Result<()> {
        fs::rename(&self.path, target).map_err(|e| CanonError::io("rename", target, e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path`.
///
/// Writes to `<path>.tmp`, syncs, then renames over the target, so readers
/// only ever observe the old or the new document. The temp file is removed
/// on every error path.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| CanonError::InvalidFormat {
        path: path.to_path_buf(),
        reason: format!("serialization failed: {e}"),
    })?;
    json.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CanonError::io("create directory", parent, e))?;
    }

    let temp = TempFile::for_target(path);

    let mut file = File::create(&temp.path).map_err(|e| CanonError::io("create", &temp.path, e))?;
    file.write_all(json.as_bytes())
        .map_err(|e| CanonError::io("write", &temp.path, e))?;
    file.sync_all()
        .map_err(|e| CanonError::io("sync", &temp.path, e))?;
    drop(file);

    temp.commit(path)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "wrote store file");
    Ok(())
}
