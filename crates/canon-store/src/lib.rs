//! Persistent storage for vocabulary mapping records.
//!
//! Each vocabulary is stored in its own directory entry:
//!
//! ```text
//! mappings/
//! ├── company_mappings.json    # MappingRecord
//! ├── company_pending.json     # ReviewQueue sidecar
//! ├── company.lock             # exclusive lock, one per vocabulary
//! ├── category_mappings.json
//! └── ...
//! ```
//!
//! A record file has the layout
//!
//! ```text
//! {
//!   "mappings": { "<variant>": "<canonical>", ... },
//!   "standardized_entities": ["<canonical>", ...]
//! }
//! ```
//!
//! # Guarantees
//!
//! - **Atomic writes**: temp file + fsync + rename; no half-written stores
//! - **Referential check on load**: dangling targets are reported, never fixed
//! - **Scoped locking**: all reads and writes take a [`VocabularyLock`]
//!
//! # Example
//!
//! ```ignore
//! use canon_model::Vocabulary;
//! use canon_store::MappingStore;
//!
//! let store = MappingStore::open("mappings")?;
//! let lock = store.lock(Vocabulary::Company)?;
//! let mut record = store.load(&lock)?;
//! record.add_canonical("Acme Corp");
//! store.save(&lock, &record)?;
//! ```

mod io;
mod lock;
mod store;

pub use io::{read_json, write_json_atomic};
pub use lock::VocabularyLock;
pub use store::MappingStore;
