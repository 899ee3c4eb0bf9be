//! Candidate screening.
//!
//! Rejects values that are clearly not entity names (identifiers, sentence
//! fragments, empty markers) before they can pollute a vocabulary.

use std::fmt;

use regex::{Regex, RegexBuilder};

use canon_model::{CanonError, Result};

use crate::config::VocabularyConfig;

/// Why a candidate was replaced by the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Empty or a "no value" marker.
    Blank,
    /// Matched an exclusion pattern.
    Excluded { pattern: String },
    TooLong { length: usize, max: usize },
    TooManyWords { words: usize, max: usize },
    /// None of the required keywords appear.
    MissingKeyword,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("blank"),
            Self::Excluded { pattern } => write!(f, "matches exclusion /{pattern}/"),
            Self::TooLong { length, max } => write!(f, "{length} chars exceeds {max}"),
            Self::TooManyWords { words, max } => write!(f, "{words} words exceeds {max}"),
            Self::MissingKeyword => f.write_str("no required keyword"),
        }
    }
}

/// Compiled screening rules for one vocabulary.
#[derive(Debug, Clone)]
pub struct Screen {
    placeholder: String,
    blank_tokens: Vec<String>,
    exclusions: Vec<Regex>,
    keywords: Vec<String>,
    max_length: Option<usize>,
    max_words: Option<usize>,
}

impl Screen {
    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        let exclusions = config
            .exclude_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| CanonError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            placeholder: config.placeholder.clone(),
            blank_tokens: config
                .blank_tokens
                .iter()
                .map(|token| token.trim().to_lowercase())
                .collect(),
            exclusions,
            keywords: config
                .required_keywords
                .iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
            max_length: config.max_length,
            max_words: config.max_words,
        })
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// `None` if the candidate may enter the vocabulary.
    pub fn check(&self, candidate: &str) -> Option<Rejection> {
        let trimmed = candidate.trim();
        let lowered = trimmed.to_lowercase();

        if trimmed.is_empty()
            || self.blank_tokens.contains(&lowered)
            || lowered == self.placeholder.to_lowercase()
        {
            return Some(Rejection::Blank);
        }

        if let Some(max) = self.max_length {
            let length = trimmed.chars().count();
            if length > max {
                return Some(Rejection::TooLong { length, max });
            }
        }

        if let Some(max) = self.max_words {
            let words = trimmed.split_whitespace().count();
            if words > max {
                return Some(Rejection::TooManyWords { words, max });
            }
        }

        if let Some(regex) = self.exclusions.iter().find(|re| re.is_match(trimmed)) {
            return Some(Rejection::Excluded {
                pattern: regex.as_str().to_string(),
            });
        }

        if !self.keywords.is_empty() && !self.keywords.iter().any(|k| lowered.contains(k.as_str()))
        {
            return Some(Rejection::MissingKeyword);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canon_model::Vocabulary;

    fn screen(vocabulary: Vocabulary) -> Screen {
        Screen::from_config(&VocabularyConfig::for_vocabulary(vocabulary)).unwrap()
    }

    #[test]
    fn blank_markers_are_rejected() {
        let company = screen(Vocabulary::Company);
        for raw in ["", "   ", "N/A", "unknown", "Unknown Company"] {
            assert_eq!(company.check(raw), Some(Rejection::Blank), "{raw:?}");
        }
    }

    #[test]
    fn company_rejects_identifiers_and_sentences() {
        let company = screen(Vocabulary::Company);
        assert!(matches!(
            company.check("3f2a9c1e-1b2c-4d5e-8f90-1234567890ab"),
            Some(Rejection::Excluded { .. })
        ));
        assert!(matches!(company.check("12345"), Some(Rejection::Excluded { .. })));
        assert!(matches!(
            company.check("The invoice did not upload"),
            Some(Rejection::Excluded { .. })
        ));
        assert!(matches!(
            company.check("<script>"),
            Some(Rejection::Excluded { .. })
        ));
        assert_eq!(company.check("Taft Electric Company"), None);
        assert_eq!(company.check("Beacon Communications, LLC"), None);
    }

    #[test]
    fn company_length_limits() {
        let company = screen(Vocabulary::Company);
        let long = "A".repeat(51);
        assert_eq!(
            company.check(&long),
            Some(Rejection::TooLong { length: 51, max: 50 })
        );
        assert_eq!(
            company.check("One Two Three Four Five Six Seven Eight Nine"),
            Some(Rejection::TooManyWords { words: 9, max: 8 })
        );
    }

    #[test]
    fn template_requires_a_keyword() {
        let template = screen(Vocabulary::Template);
        assert_eq!(template.check("Invoice Upload Failure"), None);
        assert_eq!(template.check("Hello there"), Some(Rejection::MissingKeyword));
        assert!(matches!(
            template.check("someone@example.com"),
            Some(Rejection::Excluded { .. })
        ));
    }

    #[test]
    fn category_accepts_free_text() {
        let category = screen(Vocabulary::Category);
        assert_eq!(category.check("Billing Issue"), None);
        assert_eq!(category.placeholder(), "Other");
    }

    #[test]
    fn bad_pattern_is_reported() {
        let mut config = VocabularyConfig::for_vocabulary(Vocabulary::Category);
        config.exclude_patterns = vec!["(unclosed".to_string()];
        let err = Screen::from_config(&config).unwrap_err();
        assert!(matches!(err, CanonError::InvalidPattern { .. }));
    }
}
