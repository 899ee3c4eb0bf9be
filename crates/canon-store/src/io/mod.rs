//! File I/O for store documents.
//!
//! This module handles:
//! - Atomic JSON writes (temp file + rename)
//! - Tolerant JSON reads (missing file is not an error)

mod load;
mod save;

pub use load::read_json;
pub use save::write_json_atomic;
