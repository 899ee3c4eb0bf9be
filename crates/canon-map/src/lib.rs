//! Fuzzy normalization of free-text values onto canonical vocabularies.
//!
//! A candidate string is resolved against one [`Vocabulary`]'s canonical
//! forms in confidence bands:
//!
//! | Score                          | Outcome                                  |
//! |--------------------------------|------------------------------------------|
//! | exact (under comparison key)   | `Exact`, nothing written                 |
//! | `>= auto_threshold`            | `AutoMatched`, mapping persisted         |
//! | `>= suggest_threshold`         | `PendingReview`, queued for an operator  |
//! | below, or empty vocabulary     | `NewEntity`, candidate becomes canonical |
//!
//! # Example
//!
//! ```ignore
//! use canon_map::{CanonConfig, Workspace};
//! use canon_model::Vocabulary;
//!
//! let workspace = Workspace::open(CanonConfig::default())?;
//! let outcome = workspace.normalize(Vocabulary::Company, "TaftElectric Company")?;
//! println!("{} ({})", outcome.canonical, outcome.status);
//! ```
//!
//! [`Vocabulary`]: canon_model::Vocabulary

pub mod compare;
pub mod config;
pub mod matcher;
pub mod normalizer;
pub mod records;
pub mod screen;
pub mod session;

pub use compare::{ComparisonRule, normalize_text};
pub use config::{
    Band, CanonConfig, DEFAULT_AUTO_THRESHOLD, DEFAULT_SUGGEST_THRESHOLD, Thresholds,
    VocabularyConfig,
};
pub use matcher::{MatchEngine, ScoredForm, similarity};
pub use normalizer::{Decision, Normalizer, Resolution};
pub use records::{RecordSummary, StatusCounts, normalize_records};
pub use screen::{Rejection, Screen};
pub use session::{VocabularySession, VocabularySummary, Workspace};
