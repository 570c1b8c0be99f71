//! Document-type security policies.
//!
//! A policy declares which PII categories may remain visible in a given
//! document type and which must always be masked. Unknown document types
//! fall back to the `general` policy (mask everything) — that fallback is
//! itself a policy decision, not an error.

use crate::error::{Error, Result};
use crate::filter::{FilterReport, FilterStatus};
use crate::pii::{Detector, Masker, PiiCategory};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the fallback policy applied to unrecognized document types.
pub const DEFAULT_POLICY: &str = "general";

/// Per-document-type allow/mask declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPolicy {
    pub document_type: String,
    /// Categories permitted to remain visible (e.g. date-of-birth on a
    /// birth certificate).
    #[serde(default)]
    pub allowed: BTreeSet<PiiCategory>,
    #[serde(default)]
    pub mask_required: BTreeSet<PiiCategory>,
    #[serde(default)]
    pub strict: bool,
}

impl DocumentPolicy {
    /// A well-formed policy keeps its allow and mask sets disjoint.
    fn validate(&self) -> Result<()> {
        let overlap: Vec<_> = self.allowed.intersection(&self.mask_required).collect();
        if !overlap.is_empty() {
            return Err(Error::Policy(format!(
                "policy '{}' lists categories as both allowed and mask-required: {:?}",
                self.document_type, overlap
            )));
        }
        Ok(())
    }
}

/// Immutable policy lookup table with a guaranteed `general` fallback.
pub struct PolicyTable {
    policies: BTreeMap<String, DocumentPolicy>,
}

impl PolicyTable {
    /// Validate and index the policies.
    ///
    /// When no `general` policy is supplied, one is synthesized with an
    /// empty allow-list and every known category mask-required.
    pub fn new(policies: Vec<DocumentPolicy>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for policy in policies {
            policy.validate()?;
            table.insert(policy.document_type.clone(), policy);
        }
        table
            .entry(DEFAULT_POLICY.to_string())
            .or_insert_with(general_policy);

        Ok(Self { policies: table })
    }

    /// Look up a policy, falling back to `general` for unknown types.
    pub fn resolve(&self, document_type: &str) -> &DocumentPolicy {
        self.policies.get(document_type).unwrap_or_else(|| {
            tracing::debug!(document_type, "Unknown document type, using general policy");
            &self.policies[DEFAULT_POLICY]
        })
    }

    pub fn document_types(&self) -> Vec<&str> {
        self.policies.keys().map(String::as_str).collect()
    }
}

fn general_policy() -> DocumentPolicy {
    DocumentPolicy {
        document_type: DEFAULT_POLICY.to_string(),
        allowed: BTreeSet::new(),
        mask_required: PiiCategory::all().into_iter().collect(),
        strict: true,
    }
}

/// Built-in policies for the supported government document types.
pub fn default_policies() -> Vec<DocumentPolicy> {
    vec![
        DocumentPolicy {
            document_type: "birth_certificate".to_string(),
            allowed: [PiiCategory::DateOfBirth].into(),
            mask_required: [
                PiiCategory::NationalId,
                PiiCategory::Ssn,
                PiiCategory::Phone,
                PiiCategory::Email,
            ]
            .into(),
            strict: true,
        },
        DocumentPolicy {
            document_type: "passport".to_string(),
            allowed: [PiiCategory::Passport, PiiCategory::DateOfBirth].into(),
            mask_required: [
                PiiCategory::NationalId,
                PiiCategory::Ssn,
                PiiCategory::Phone,
                PiiCategory::Email,
                PiiCategory::CreditCard,
            ]
            .into(),
            strict: true,
        },
        general_policy(),
    ]
}

/// Applies the policy partition: detect once, leave allowed categories
/// untouched, mask the complement.
pub struct PolicyEngine {
    detector: Detector,
    masker: Masker,
    table: PolicyTable,
}

impl PolicyEngine {
    pub fn new(detector: Detector, table: PolicyTable) -> Self {
        Self {
            detector,
            masker: Masker::new(),
            table,
        }
    }

    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    /// Filter text under the policy for `document_type`.
    ///
    /// The report carries separate counts for the masked partition
    /// (`category_counts`) and the allowed partition (`allowed_counts`),
    /// so callers can tell "PII present by design" apart from
    /// "PII redacted".
    pub fn apply(&self, text: &str, document_type: &str) -> FilterReport {
        let policy = self.table.resolve(document_type);
        let detected = self.detector.detect(text);
        let (allowed, to_mask) = detected.partition(|c| policy.allowed.contains(&c));

        let outcome = self.masker.mask(text, &to_mask);

        tracing::info!(
            document_type,
            masked = outcome.total_masked,
            allowed = allowed.total(),
            "Applied security policy"
        );

        let mut report = FilterReport::new(FilterStatus::Success, "mask", text.chars().count());
        report.filtered_text = Some(outcome.masked_text);
        report.category_counts = outcome.summary;
        report.allowed_counts = allowed.counts();
        report.policy_applied = Some(document_type.to_string());
        report.strict = Some(policy.strict);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pii::{default_pii_rules, RuleSet};
    use std::sync::Arc;

    fn engine() -> PolicyEngine {
        let rules = Arc::new(RuleSet::compile(&default_pii_rules()).unwrap());
        PolicyEngine::new(
            Detector::new(rules),
            PolicyTable::new(default_policies()).unwrap(),
        )
    }

    #[test]
    fn test_overlapping_policy_rejected() {
        let result = PolicyTable::new(vec![DocumentPolicy {
            document_type: "broken".to_string(),
            allowed: [PiiCategory::Email].into(),
            mask_required: [PiiCategory::Email].into(),
            strict: false,
        }]);
        assert!(matches!(result, Err(Error::Policy(_))));
    }

    #[test]
    fn test_general_fallback_synthesized() {
        let table = PolicyTable::new(vec![]).unwrap();
        let policy = table.resolve("anything");
        assert_eq!(policy.document_type, DEFAULT_POLICY);
        assert_eq!(policy.mask_required.len(), PiiCategory::all().len());
    }

    #[test]
    fn test_birth_certificate_keeps_dob_masks_national_id() {
        let text = "Nacido el 15 de marzo, 1985. DNI: 123-45-6789-X";
        let report = engine().apply(text, "birth_certificate");
        let filtered = report.filtered_text.unwrap();

        assert!(filtered.contains("15 de marzo, 1985"));
        assert!(!filtered.contains("123-45-6789-X"));
        assert_eq!(report.allowed_counts[&PiiCategory::DateOfBirth], 1);
        assert_eq!(report.category_counts[&PiiCategory::NationalId], 1);
        assert_eq!(report.policy_applied.as_deref(), Some("birth_certificate"));
        assert_eq!(report.strict, Some(true));
    }

    #[test]
    fn test_unknown_type_masks_everything() {
        let text = "Nacido el 15 de marzo, 1985";
        let report = engine().apply(text, "mystery_form");
        let filtered = report.filtered_text.unwrap();

        assert!(!filtered.contains("15 de marzo, 1985"));
        assert_eq!(report.category_counts[&PiiCategory::DateOfBirth], 1);
        assert!(report.allowed_counts.is_empty());
    }

    #[test]
    fn test_passport_policy_keeps_passport_number() {
        let text = "Passport ESP-123456789, card 4111-1111-1111-1111";
        let report = engine().apply(text, "passport");
        let filtered = report.filtered_text.unwrap();

        assert!(!filtered.contains("4111-1111-1111-1111"));
        assert!(report.allowed_counts.contains_key(&PiiCategory::Passport));
    }
}
