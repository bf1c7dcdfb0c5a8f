//! Response vocabulary checks.
//!
//! Scans a candidate response for the protocol's banned terms and avoided
//! phrases. Matching is plain case-insensitive substring containment, so a
//! banned term also matches inside longer words ("art" matches "party").
//!
//! | Check | On match | On miss |
//! |-------|----------|---------|
//! | `vocabulary.banned_terms` | `banned_term` violation | `banned_term_absent` passed check |
//! | `identity.language.avoid` | `language_avoid` violation | nothing recorded |
//!
//! When no violation is found at all, one `vocabulary_and_language` summary
//! check is appended.

use serde::{Deserialize, Serialize};

use crate::protocol::Protocol;

/// Recommendation when at least one violation was found.
pub const RECOMMEND_ON_VIOLATION: &str =
    "Ensure factual claims are cited; stay within boundaries and vocabulary.";

/// Recommendation when the response is clean.
pub const RECOMMEND_ON_PASS: &str =
    "Response passes basic protocol checks; continue to verify sourcing and boundaries.";

/// Message on the summary check recorded for a clean response.
pub const CLEAN_SUMMARY: &str = "No banned terms or avoided phrases detected";

/// A vocabulary rule the response broke.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    /// A banned term appears in the response
    BannedTerm { value: String },

    /// An avoided phrase appears in the response
    LanguageAvoid { value: String },
}

impl Violation {
    /// The term or phrase, in its declared casing.
    pub fn value(&self) -> &str {
        match self {
            Violation::BannedTerm { value } | Violation::LanguageAvoid { value } => value,
        }
    }
}

/// A check the response satisfied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PassedCheck {
    /// A banned term that does not appear
    BannedTermAbsent { value: String },

    /// Summary recorded only when nothing was violated
    VocabularyAndLanguage { message: String },
}

/// Outcome of checking one response against one protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    /// True iff `violations` is empty
    pub valid: bool,

    pub violations: Vec<Violation>,

    pub passed_checks: Vec<PassedCheck>,

    pub recommendation: String,
}

impl ValidationReport {
    /// Values of all `banned_term` violations, in order.
    pub fn banned_terms_found(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|v| matches!(v, Violation::BannedTerm { .. }))
            .map(Violation::value)
            .collect()
    }

    /// Values of all `language_avoid` violations, in order.
    pub fn avoided_phrases_found(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|v| matches!(v, Violation::LanguageAvoid { .. }))
            .map(Violation::value)
            .collect()
    }
}

/// Check `response` against the protocol's vocabulary rules.
///
/// Records follow declaration order, with every banned term visited before
/// any avoided phrase.
pub fn validate_response(response: &str, protocol: &Protocol) -> ValidationReport {
    let lower = response.to_lowercase();
    let mut violations = Vec::new();
    let mut passed_checks = Vec::new();

    for term in protocol.banned_terms() {
        if lower.contains(&term.to_lowercase()) {
            violations.push(Violation::BannedTerm {
                value: term.clone(),
            });
        } else {
            passed_checks.push(PassedCheck::BannedTermAbsent {
                value: term.clone(),
            });
        }
    }

    // Misses are not recorded for avoided phrases.
    for phrase in protocol.avoided_phrases() {
        if lower.contains(&phrase.to_lowercase()) {
            violations.push(Violation::LanguageAvoid {
                value: phrase.clone(),
            });
        }
    }

    if violations.is_empty() {
        passed_checks.push(PassedCheck::VocabularyAndLanguage {
            message: CLEAN_SUMMARY.to_string(),
        });
    }

    let valid = violations.is_empty();
    tracing::debug!(
        valid,
        violations = violations.len(),
        passed = passed_checks.len(),
        "Validated response"
    );

    ValidationReport {
        valid,
        violations,
        passed_checks,
        recommendation: if valid {
            RECOMMEND_ON_PASS
        } else {
            RECOMMEND_ON_VIOLATION
        }
        .to_string(),
    }
}
