//! Per-category PII masking strategies.

use crate::pii::detector::DetectionResult;
use crate::pii::rules::{PiiCategory, MASK_CHAR};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of a masking pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskOutcome {
    pub masked_text: String,
    /// Detected instances per category (the masking summary).
    pub summary: BTreeMap<PiiCategory, usize>,
    pub total_masked: usize,
}

/// Replaces detected literals with redacted placeholders.
///
/// Masks are deterministic and preserve structural cues (length, partial
/// visibility) so downstream formatting checks still work, but never
/// contain the original matched substring.
#[derive(Clone, Default)]
pub struct Masker;

impl Masker {
    pub fn new() -> Self {
        Self
    }

    /// Substitute every detected literal with its category mask.
    ///
    /// Replacement is a literal (non-regex) replace of each matched
    /// substring throughout the text, applied per instance in rule-table
    /// order. When a literal is no longer present because an earlier
    /// replacement consumed it (one match nested in another), the earlier
    /// write stands; the collision is logged, not repaired.
    pub fn mask(&self, text: &str, detected: &DetectionResult) -> MaskOutcome {
        let mut masked_text = text.to_string();
        let mut total_masked = 0;

        for (category, matches) in detected.iter() {
            for literal in matches {
                if !masked_text.contains(literal.as_str()) {
                    tracing::warn!(
                        category = %category,
                        "Masking collision: literal already consumed by an earlier replacement"
                    );
                    total_masked += 1;
                    continue;
                }
                let mask = mask_value(category, literal);
                masked_text = masked_text.replace(literal.as_str(), &mask);
                total_masked += 1;
            }
        }

        let summary = detected.counts();
        tracing::info!(
            total = total_masked,
            categories = summary.len(),
            "Masked PII instances"
        );

        MaskOutcome {
            masked_text,
            summary,
            total_masked,
        }
    }
}

/// Build the replacement string for one matched literal.
pub fn mask_value(category: PiiCategory, literal: &str) -> String {
    match category {
        PiiCategory::Email => mask_email(literal),
        PiiCategory::Phone
        | PiiCategory::Ssn
        | PiiCategory::NationalId
        | PiiCategory::CreditCard => mask_keep_tail(literal),
        PiiCategory::Passport => mask_passport(literal),
        PiiCategory::DateOfBirth => mask_date_of_birth(literal),
    }
}

/// Keep the first local-part character and the domain; mask the rest of
/// the local part. A literal without exactly one `@` is fully masked.
fn mask_email(literal: &str) -> String {
    let parts: Vec<&str> = literal.split('@').collect();
    if parts.len() == 2 && !parts[0].is_empty() {
        let local: Vec<char> = parts[0].chars().collect();
        format!(
            "{}{}@{}",
            local[0],
            MASK_CHAR.to_string().repeat(local.len() - 1),
            parts[1]
        )
    } else {
        full_mask(literal)
    }
}

/// Keep the last `min(4, ceil(len/3))` characters, mask the rest.
/// Equal length to the original, so an 11-char SSN keeps its last 4.
fn mask_keep_tail(literal: &str) -> String {
    let chars: Vec<char> = literal.chars().collect();
    let visible = 4.min(chars.len().div_ceil(3));
    let masked: String = MASK_CHAR.to_string().repeat(chars.len() - visible);
    let tail: String = chars[chars.len() - visible..].iter().collect();
    format!("{}{}", masked, tail)
}

/// Keep the 3-letter country code, mask a fixed 9-character tail.
fn mask_passport(literal: &str) -> String {
    let prefix: String = literal.chars().take(3).collect();
    format!("{}-{}", prefix, MASK_CHAR.to_string().repeat(9))
}

/// Replace day and month tokens with a fixed placeholder, keep the
/// trailing year token.
fn mask_date_of_birth(literal: &str) -> String {
    let tokens: Vec<&str> = literal.split_whitespace().collect();
    if tokens.len() >= 3 {
        format!("XX de XXXX, {}", tokens[tokens.len() - 1])
    } else {
        "XX de XXXX, XXXX".to_string()
    }
}

fn full_mask(literal: &str) -> String {
    MASK_CHAR.to_string().repeat(literal.chars().count())
}
