//! Persisted `variant -> canonical` mapping table for one vocabulary.
//!
//! The record is the unit of persistence: it is loaded once per session,
//! mutated in place and written back atomically. Canonical forms only ever
//! grow through this API; removal and renaming are manual edits of the file.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{CanonError, Result};

/// Mapping table plus the set of canonical forms it may point at.
///
/// Invariant: every value in `mappings` is a member of
/// `standardized_entities`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// Observed variant -> canonical form.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
    /// Registered canonical forms.
    #[serde(default)]
    pub standardized_entities: BTreeSet<String>,
}

impl MappingRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canonical form. Returns `false` if it was already present.
    pub fn add_canonical(&mut self, form: &str) -> bool {
        if self.standardized_entities.contains(form) {
            return false;
        }
        self.standardized_entities.insert(form.to_string())
    }

    /// Map `variant` onto an already registered `canonical` form.
    ///
    /// Overwrites any previous target of `variant`.
    pub fn add_mapping(&mut self, variant: &str, canonical: &str) -> Result<()> {
        if !self.standardized_entities.contains(canonical) {
            return Err(CanonError::UnknownCanonical {
                variant: variant.to_string(),
                canonical: canonical.to_string(),
            });
        }
        self.mappings
            .insert(variant.to_string(), canonical.to_string());
        Ok(())
    }

    /// Canonical form a known variant resolves to.
    pub fn mapped(&self, variant: &str) -> Option<&str> {
        self.mappings.get(variant).map(String::as_str)
    }

    /// Whether `form` is a registered canonical form (exact string).
    pub fn is_canonical(&self, form: &str) -> bool {
        self.standardized_entities.contains(form)
    }

    /// Canonical forms in sorted order.
    pub fn canonical_forms(&self) -> impl Iterator<Item = &str> + '_ {
        self.standardized_entities.iter().map(String::as_str)
    }

    /// First mapping whose target is not registered, if any.
    pub fn dangling_mapping(&self) -> Option<(&str, &str)> {
        self.mappings
            .iter()
            .find(|(_, canonical)| !self.standardized_entities.contains(*canonical))
            .map(|(variant, canonical)| (variant.as_str(), canonical.as_str()))
    }

    /// Number of stored variant mappings.
    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// Number of canonical forms.
    pub fn canonical_count(&self) -> usize {
        self.standardized_entities.len()
    }
}
