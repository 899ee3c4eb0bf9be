//! Error types for normalization and mapping-store operations.
//!
//! Every failure carries enough context to be surfaced to an operator.
//! Nothing in this taxonomy is resolved by guessing: callers decide whether
//! to retry, abort, or escalate.

use std::path::PathBuf;

use thiserror::Error;

use crate::review::ReviewId;
use crate::vocabulary::Vocabulary;

/// Normalization error.
#[derive(Debug, Error)]
pub enum CanonError {
    /// A stored mapping points at a canonical form that is not registered.
    #[error(
        "Mapping store {path} is corrupt: '{variant}' maps to unregistered canonical form '{canonical}'"
    )]
    CorruptStore {
        path: PathBuf,
        variant: String,
        canonical: String,
    },

    /// Attempt to map a variant onto a canonical form that does not exist yet.
    #[error("Cannot map '{variant}' to '{canonical}': canonical form is not registered")]
    UnknownCanonical { variant: String, canonical: String },

    /// Underlying read, write, lock or rename failure.
    #[error("Failed to {operation} {path}")]
    StoreIo {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Threshold ordering violated at construction.
    #[error(
        "Invalid thresholds: require 0 <= suggest_threshold ({suggest}) < auto_threshold ({auto}) <= 1"
    )]
    InvalidThresholdConfig { auto: f64, suggest: f64 },

    /// Store file exists but is not a mapping document.
    #[error("Mapping store {path} could not be parsed: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// No queued review with this id.
    #[error("No pending {vocabulary} review with id {id}")]
    UnknownReview { vocabulary: Vocabulary, id: ReviewId },

    /// Queued variant was resolved after it was queued.
    #[error("Pending {vocabulary} review {id} is stale: '{variant}' already resolves to '{canonical}'")]
    StaleReview {
        vocabulary: Vocabulary,
        id: ReviewId,
        variant: String,
        canonical: String,
    },

    /// Operator supplied an empty canonical form.
    #[error("Canonical form must not be blank")]
    BlankCanonical,

    /// Screening pattern failed to compile.
    #[error("Invalid screening pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl CanonError {
    /// Build a [`CanonError::StoreIo`] from an I/O error.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreIo {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::CorruptStore { canonical, .. } => Some(format!(
                "Add '{canonical}' to standardized_entities or remove the mapping by hand; \
                 the store is never repaired automatically."
            )),
            Self::UnknownCanonical { .. } => {
                Some("Register the canonical form before mapping variants to it.".into())
            }
            Self::StoreIo { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check disk space and permissions for the mappings directory.".into())
                }
            }
            Self::InvalidThresholdConfig { .. } => Some(
                "Pick thresholds in [0, 1] with suggest_threshold strictly below auto_threshold."
                    .into(),
            ),
            Self::InvalidFormat { .. } => {
                Some("Restore the file from a backup or fix the JSON by hand.".into())
            }
            Self::UnknownReview { .. } => {
                Some("List pending reviews to find a valid id; it may already be resolved.".into())
            }
            Self::StaleReview { .. } => Some(
                "Reopen the vocabulary to drop stale reviews; the existing mapping is kept.".into(),
            ),
            Self::BlankCanonical => None,
            Self::InvalidPattern { .. } => {
                Some("Patterns use Rust regex syntax and are matched case-insensitively.".into())
            }
            Self::Config { .. } => Some("Compare the file against the documented canon.toml layout.".into()),
        }
    }
}

/// Result type alias for normalization operations.
pub type Result<T> = std::result::Result<T, CanonError>;
