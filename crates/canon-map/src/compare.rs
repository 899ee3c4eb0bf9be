//! Comparison keys.
//!
//! Keys are only ever used to compare strings; stored variants and
//! canonical forms keep their original spelling.

use serde::{Deserialize, Serialize};

/// Trailing words dropped by [`ComparisonRule::StripLegalSuffix`].
const LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "llc",
    "ltd",
    "co",
    "corp",
    "corporation",
    "company",
    "limited",
];

/// Vocabulary-specific comparison normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonRule {
    /// Case fold, trim, collapse internal whitespace.
    #[default]
    Basic,
    /// `Basic`, then drop trailing legal-entity suffixes such as `Inc.`
    /// or `, LLC`.
    StripLegalSuffix,
}

impl ComparisonRule {
    /// Comparison key for `raw` under this rule.
    pub fn key(&self, raw: &str) -> String {
        let basic = normalize_text(raw);
        match self {
            Self::Basic => basic,
            Self::StripLegalSuffix => strip_legal_suffixes(&basic),
        }
    }
}

/// Lowercases, trims and collapses runs of whitespace to single spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_legal_suffixes(key: &str) -> String {
    let mut current = key;
    loop {
        let trimmed = current.trim_end_matches(['.', ',', ' ']);
        let Some((head, last)) = trimmed.rsplit_once(' ') else {
            break;
        };
        if !LEGAL_SUFFIXES.contains(&last) {
            break;
        }
        let head = head.trim_end_matches([',', ' ']);
        if head.is_empty() {
            break;
        }
        current = head;
    }
    if current.len() == key.len() {
        key.to_string()
    } else {
        current.trim_end_matches(['.', ',', ' ']).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_folds_case_and_whitespace() {
        assert_eq!(normalize_text("  Taft   Electric\tCompany "), "taft electric company");
        assert_eq!(ComparisonRule::Basic.key("ACME corp"), "acme corp");
    }

    #[test]
    fn strips_single_legal_suffix() {
        let rule = ComparisonRule::StripLegalSuffix;
        assert_eq!(rule.key("Beacon Communications, LLC"), "beacon communications");
        assert_eq!(rule.key("Ben Hur Construction Co."), "ben hur construction");
        assert_eq!(rule.key("Taft Electric Company"), "taft electric");
    }

    #[test]
    fn strips_stacked_legal_suffixes() {
        assert_eq!(
            ComparisonRule::StripLegalSuffix.key("Gulf Stream Construction Co., Inc."),
            "gulf stream construction"
        );
    }

    #[test]
    fn keeps_lone_suffix_and_plain_names() {
        let rule = ComparisonRule::StripLegalSuffix;
        assert_eq!(rule.key("Inc"), "inc");
        assert_eq!(rule.key("S.M. Hentges"), "s.m. hentges");
        assert_eq!(rule.key("Haskell Lemon"), "haskell lemon");
    }
}
