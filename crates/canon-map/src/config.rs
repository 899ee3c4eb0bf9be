//! Normalizer configuration.
//!
//! Every vocabulary runs the same decision algorithm; only the values in
//! [`VocabularyConfig`] differ. A `canon.toml` file may override any of them:
//!
//! ```toml
//! mappings_dir = "mappings"
//!
//! [company]
//! auto_threshold = 0.85
//! suggest_threshold = 0.65
//!
//! [template]
//! required_keywords = ["invoice", "upload"]
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use canon_model::{CanonError, Result, Vocabulary};

use crate::compare::ComparisonRule;

/// Default minimum score for automatic mapping.
pub const DEFAULT_AUTO_THRESHOLD: f64 = 0.8;
/// Default minimum score for queueing a review.
pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.6;
/// Default mappings directory, relative to the working directory.
pub const DEFAULT_MAPPINGS_DIR: &str = "mappings";

const UUID_PATTERN: &str = r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

/// Which side of the thresholds a score falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// `score >= auto`
    Auto,
    /// `suggest <= score < auto`
    Review,
    /// `score < suggest`
    New,
}

/// Validated threshold pair with `0 <= suggest < auto <= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    auto: f64,
    suggest: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            auto: DEFAULT_AUTO_THRESHOLD,
            suggest: DEFAULT_SUGGEST_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Validate and build a threshold pair. Out-of-order or out-of-range
    /// values are rejected, never clamped.
    pub fn new(auto: f64, suggest: f64) -> Result<Self> {
        // Written so that NaN fails every comparison.
        if suggest >= 0.0 && suggest < auto && auto <= 1.0 {
            Ok(Self { auto, suggest })
        } else {
            Err(CanonError::InvalidThresholdConfig { auto, suggest })
        }
    }

    pub fn auto(&self) -> f64 {
        self.auto
    }

    pub fn suggest(&self) -> f64 {
        self.suggest
    }

    /// Lower bounds are inclusive.
    #[must_use]
    pub fn band(&self, score: f64) -> Band {
        if score >= self.auto {
            Band::Auto
        } else if score >= self.suggest {
            Band::Review
        } else {
            Band::New
        }
    }
}

/// Settings for one vocabulary's normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    pub auto_threshold: f64,
    pub suggest_threshold: f64,
    pub comparison: ComparisonRule,
    /// Returned for candidates that fail screening.
    pub placeholder: String,
    /// Inputs (case-insensitive) that mean "no value".
    pub blank_tokens: Vec<String>,
    /// Case-insensitive regexes; a match rejects the candidate.
    pub exclude_patterns: Vec<String>,
    /// When non-empty, a candidate must contain at least one keyword.
    pub required_keywords: Vec<String>,
    pub max_length: Option<usize>,
    pub max_words: Option<usize>,
}

impl VocabularyConfig {
    /// Built-in defaults for a vocabulary.
    pub fn for_vocabulary(vocabulary: Vocabulary) -> Self {
        let base = Self {
            auto_threshold: DEFAULT_AUTO_THRESHOLD,
            suggest_threshold: DEFAULT_SUGGEST_THRESHOLD,
            comparison: ComparisonRule::Basic,
            placeholder: "Other".to_string(),
            blank_tokens: vec!["n/a".to_string(), "unknown".to_string()],
            exclude_patterns: Vec::new(),
            required_keywords: Vec::new(),
            max_length: None,
            max_words: None,
        };
        match vocabulary {
            Vocabulary::Company => Self {
                comparison: ComparisonRule::StripLegalSuffix,
                placeholder: "Unknown Company".to_string(),
                exclude_patterns: company_exclusions(),
                max_length: Some(50),
                max_words: Some(8),
                ..base
            },
            Vocabulary::Category => base,
            Vocabulary::Template => Self {
                exclude_patterns: vec![
                    UUID_PATTERN.to_string(),
                    r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$".to_string(),
                ],
                required_keywords: [
                    "vendor",
                    "prediction",
                    "system",
                    "performance",
                    "error",
                    "upload",
                    "document",
                    "integration",
                    "erp",
                    "accounting",
                    "invoice",
                    "submit",
                    "unexpected",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                ..base
            },
        }
    }

    /// Validated thresholds from this config.
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.auto_threshold, self.suggest_threshold)
    }

    fn apply(&mut self, overrides: VocabularyOverrides) {
        let VocabularyOverrides {
            auto_threshold,
            suggest_threshold,
            comparison,
            placeholder,
            blank_tokens,
            exclude_patterns,
            required_keywords,
            max_length,
            max_words,
        } = overrides;
        if let Some(value) = auto_threshold {
            self.auto_threshold = value;
        }
        if let Some(value) = suggest_threshold {
            self.suggest_threshold = value;
        }
        if let Some(value) = comparison {
            self.comparison = value;
        }
        if let Some(value) = placeholder {
            self.placeholder = value;
        }
        if let Some(value) = blank_tokens {
            self.blank_tokens = value;
        }
        if let Some(value) = exclude_patterns {
            self.exclude_patterns = value;
        }
        if let Some(value) = required_keywords {
            self.required_keywords = value;
        }
        if let Some(value) = max_length {
            self.max_length = Some(value);
        }
        if let Some(value) = max_words {
            self.max_words = Some(value);
        }
    }
}

fn company_exclusions() -> Vec<String> {
    [
        UUID_PATTERN,
        r"^[0-9]+$",
        r"^[0-9.-]+$",
        r"^<",
        r"error|issue|warning|incorrect|wrong|missing|invoice|wizard|system|prediction|vendor|document",
        r"^(the|there|is|we|not|this|all|due|changed|data|po|sql|should|wizard|grant|email|invoice|sales)\s",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Whole-application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonConfig {
    pub mappings_dir: PathBuf,
    pub company: VocabularyConfig,
    pub category: VocabularyConfig,
    pub template: VocabularyConfig,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self {
            mappings_dir: PathBuf::from(DEFAULT_MAPPINGS_DIR),
            company: VocabularyConfig::for_vocabulary(Vocabulary::Company),
            category: VocabularyConfig::for_vocabulary(Vocabulary::Category),
            template: VocabularyConfig::for_vocabulary(Vocabulary::Template),
        }
    }
}

impl CanonConfig {
    pub fn vocabulary(&self, vocabulary: Vocabulary) -> &VocabularyConfig {
        match vocabulary {
            Vocabulary::Company => &self.company,
            Vocabulary::Category => &self.category,
            Vocabulary::Template => &self.template,
        }
    }

    pub fn vocabulary_mut(&mut self, vocabulary: Vocabulary) -> &mut VocabularyConfig {
        match vocabulary {
            Vocabulary::Company => &mut self.company,
            Vocabulary::Category => &mut self.category,
            Vocabulary::Template => &mut self.template,
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml_str(&text, path)?;
                tracing::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(CanonError::io("read", path, e)),
        }
    }

    /// Parse configuration text. `origin` is only used in error messages.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| CanonError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::default();
        if let Some(dir) = file.mappings_dir {
            config.mappings_dir = dir;
        }
        for (vocabulary, overrides) in [
            (Vocabulary::Company, file.company),
            (Vocabulary::Category, file.category),
            (Vocabulary::Template, file.template),
        ] {
            if let Some(overrides) = overrides {
                config.vocabulary_mut(vocabulary).apply(overrides);
            }
        }

        for vocabulary in Vocabulary::ALL {
            config
                .vocabulary(vocabulary)
                .thresholds()
                .map_err(|e| CanonError::Config {
                    path: origin.to_path_buf(),
                    reason: format!("[{vocabulary}] {e}"),
                })?;
        }
        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    mappings_dir: Option<PathBuf>,
    company: Option<VocabularyOverrides>,
    category: Option<VocabularyOverrides>,
    template: Option<VocabularyOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VocabularyOverrides {
    auto_threshold: Option<f64>,
    suggest_threshold: Option<f64>,
    comparison: Option<ComparisonRule>,
    placeholder: Option<String>,
    blank_tokens: Option<Vec<String>>,
    exclude_patterns: Option<Vec<String>>,
    required_keywords: Option<Vec<String>>,
    max_length: Option<usize>,
    max_words: Option<usize>,
}
