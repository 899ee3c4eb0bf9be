//! JSON reads.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;

use canon_model::{CanonError, Result};

/// Read and parse a JSON document. Returns `None` if the file is missing.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CanonError::io("read", path, e)),
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| CanonError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
