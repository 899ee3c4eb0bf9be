use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the independent normalization domains.
///
/// Each vocabulary owns its own store file, lock and review queue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    /// Company names scraped from sender signatures and bodies.
    Company,
    /// Support-ticket category labels.
    Category,
    /// Email subject templates.
    Template,
}

impl Vocabulary {
    /// All vocabularies, in store order.
    pub const ALL: [Self; 3] = [Self::Company, Self::Category, Self::Template];

    /// Short identifier used in file names and config tables.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Category => "category",
            Self::Template => "template",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Company => "company name",
            Self::Category => "support category",
            Self::Template => "subject template",
        }
    }

    /// Record field that carries this vocabulary in ingested records.
    #[must_use]
    pub const fn record_field(&self) -> &'static str {
        match self {
            Self::Company => "company_name",
            Self::Category => "support_category",
            Self::Template => "subject_template",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
