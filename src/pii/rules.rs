//! PII categories and the compiled detection rule table.
//!
//! The rule table is process-wide configuration: built once at startup,
//! validated, and injected into the engines behind `Arc`. There is no
//! write path after construction.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Character used for masked spans
pub const MASK_CHAR: char = '*';

/// PII category tag.
///
/// Variants are declared in rule-table order so that derived `Ord`
/// iteration order equals rule-evaluation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    NationalId,
    Ssn,
    Phone,
    Email,
    CreditCard,
    DateOfBirth,
    Passport,
}

impl PiiCategory {
    /// All known categories, in rule-table order.
    pub fn all() -> [PiiCategory; 7] {
        [
            Self::NationalId,
            Self::Ssn,
            Self::Phone,
            Self::Email,
            Self::CreditCard,
            Self::DateOfBirth,
            Self::Passport,
        ]
    }

    /// Wire name of the category (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NationalId => "national_id",
            Self::Ssn => "ssn",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::CreditCard => "credit_card",
            Self::DateOfBirth => "date_of_birth",
            Self::Passport => "passport",
        }
    }
}

impl std::fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detection rule: category plus matching expression.
///
/// Patterns with capture groups opt into flattening: each match is
/// reported as the concatenation of its captured groups (trimmed)
/// instead of the full span, which lets a rule target sub-fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiRule {
    pub category: PiiCategory,
    pub pattern: String,
}

impl PiiRule {
    pub fn new(category: PiiCategory, pattern: impl Into<String>) -> Self {
        Self {
            category,
            pattern: pattern.into(),
        }
    }
}

/// Compiled, immutable rule table.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<(PiiCategory, Regex)>,
}

impl RuleSet {
    /// Compile a rule list, preserving table order.
    ///
    /// Rejects patterns that fail to compile and patterns that match the
    /// empty string (a zero-width rule would loop forever in replacement).
    pub fn compile(rules: &[PiiRule]) -> Result<Self> {
        let compiled = rules
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).map_err(|e| {
                    Error::Pattern(format!("{}: {}", rule.category, e))
                })?;
                if regex.is_match("") {
                    return Err(Error::Pattern(format!(
                        "{}: pattern matches the empty string",
                        rule.category
                    )));
                }
                Ok((rule.category, regex))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules: compiled })
    }

    /// Compiled rules in table order.
    pub fn rules(&self) -> &[(PiiCategory, Regex)] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Default PII detection rules for government documents.
///
/// Date-of-birth targets the Spanish long form ("15 de marzo, 1985"),
/// the national-id is the Spanish DNI-style `NNN-NN-NNNN-L` shape.
pub fn default_pii_rules() -> Vec<PiiRule> {
    vec![
        PiiRule::new(PiiCategory::NationalId, r"\b\d{3}-\d{2}-\d{4}-[A-Z]\b"),
        PiiRule::new(PiiCategory::Ssn, r"\b\d{3}-\d{2}-\d{4}\b"),
        PiiRule::new(
            PiiCategory::Phone,
            r"\b(?:\+?\d{1,3}[-.\s]?)?\(?\d{2,3}\)?[-.\s]?\d{3,4}[-.\s]?\d{3,4}\b",
        ),
        PiiRule::new(
            PiiCategory::Email,
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        ),
        PiiRule::new(
            PiiCategory::CreditCard,
            r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
        ),
        PiiRule::new(PiiCategory::DateOfBirth, r"\b\d{1,2}\s+de\s+\w+,?\s+\d{4}\b"),
        PiiRule::new(PiiCategory::Passport, r"\b[A-Z]{3}-\d{9}\b"),
    ]
}
