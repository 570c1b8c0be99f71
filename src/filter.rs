//! Boundary filter façade.
//!
//! `SecurityFilter` is the single entry point orchestration uses: one of
//! three modes (`detect`, `mask`, `verify`) over the whole category set,
//! returning a uniform `FilterReport`. Policy-aware filtering lives in
//! [`crate::policy::PolicyEngine`]; this façade is deliberately
//! policy-agnostic.

use crate::pii::{DetectionResult, Detector, Masker, PiiCategory, Verification, Verifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

/// Report status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStatus {
    Success,
    Warning,
    Safe,
    Unsafe,
    Error,
}

/// Filter operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Detect,
    Mask,
    Verify,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Mask => "mask",
            Self::Verify => "verify",
        }
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detect" => Ok(Self::Detect),
            "mask" => Ok(Self::Mask),
            "verify" => Ok(Self::Verify),
            other => Err(format!("Invalid mode: {other}")),
        }
    }
}

/// Uniform result envelope for every filter invocation.
///
/// Produced fresh per call and never mutated after return; this is the
/// unit of observability at the boundary. `category_counts` keys are
/// always a subset of the categories detected in the original text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterReport {
    pub status: FilterStatus,
    pub mode: String,
    pub original_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_text: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub category_counts: BTreeMap<PiiCategory, usize>,
    /// Instances left visible by policy (policy path only).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub allowed_counts: BTreeMap<PiiCategory, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_applied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FilterReport {
    pub fn new(status: FilterStatus, mode: impl Into<String>, original_length: usize) -> Self {
        Self {
            status,
            mode: mode.into(),
            original_length,
            filtered_text: None,
            category_counts: BTreeMap::new(),
            allowed_counts: BTreeMap::new(),
            verification: None,
            policy_applied: None,
            strict: None,
            warning: None,
            error: None,
        }
    }

    /// Recoverable error report for a caller mistake (e.g. unknown mode).
    pub fn error(mode: impl Into<String>, original_length: usize, message: impl Into<String>) -> Self {
        let mut report = Self::new(FilterStatus::Error, mode, original_length);
        report.error = Some(message.into());
        report
    }
}

/// Policy-agnostic raw filter over the entire category set.
#[derive(Clone)]
pub struct SecurityFilter {
    detector: Detector,
    masker: Masker,
    verifier: Verifier,
    verify_threshold: usize,
}

impl SecurityFilter {
    pub fn new(detector: Detector, verify_threshold: usize) -> Self {
        let verifier = Verifier::new(detector.clone());
        Self {
            detector,
            masker: Masker::new(),
            verifier,
            verify_threshold,
        }
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }

    /// Run one filter pass in the given mode.
    ///
    /// In `Mask` mode with `verify` set, the masked output is immediately
    /// re-verified; residual PII downgrades the status to `warning`, never
    /// `error` — masking is best-effort, not blocking.
    pub fn apply(&self, text: &str, mode: FilterMode, verify: bool) -> FilterReport {
        let mut report =
            FilterReport::new(FilterStatus::Success, mode.as_str(), text.chars().count());

        match mode {
            FilterMode::Detect => {
                let detected = self.detector.detect(text);
                report.category_counts = detected.counts();
            }
            FilterMode::Mask => {
                let detected = self.detector.detect(text);
                let outcome = self.masker.mask(text, &detected);
                report.category_counts = outcome.summary;
                report.filtered_text = Some(outcome.masked_text);

                if verify {
                    let verification = self.verifier.verify(
                        report.filtered_text.as_deref().unwrap_or_default(),
                        self.verify_threshold,
                    );
                    if !verification.is_safe {
                        report.status = FilterStatus::Warning;
                        report.warning = Some("Some PII may remain after masking".to_string());
                    }
                    report.verification = Some(verification);
                }
            }
            FilterMode::Verify => {
                let verification = self.verifier.verify(text, self.verify_threshold);
                report.status = if verification.is_safe {
                    FilterStatus::Safe
                } else {
                    FilterStatus::Unsafe
                };
                report.category_counts = verification.detected.counts();
                report.verification = Some(verification);
            }
        }

        report
    }

    /// String-mode entry point for wire callers.
    ///
    /// An unknown mode is a recoverable, caller-visible condition: it
    /// yields a status-`error` report rather than panicking or erring.
    pub fn apply_raw(&self, text: &str, mode: &str, verify: bool) -> FilterReport {
        match FilterMode::from_str(mode) {
            Ok(parsed) => self.apply(text, parsed, verify),
            Err(message) => FilterReport::error(mode, text.chars().count(), message),
        }
    }
}

/// Convenience constructor sharing one rule set across the engines.
pub fn filter_from_rules(rules: Arc<crate::pii::RuleSet>, verify_threshold: usize) -> SecurityFilter {
    SecurityFilter::new(Detector::new(rules), verify_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pii::{default_pii_rules, RuleSet};

    fn filter() -> SecurityFilter {
        let rules = Arc::new(RuleSet::compile(&default_pii_rules()).unwrap());
        filter_from_rules(rules, 0)
    }

    #[test]
    fn test_detect_mode_counts_only() {
        let report = filter().apply("ssn 123-45-6789", FilterMode::Detect, true);
        assert_eq!(report.status, FilterStatus::Success);
        assert_eq!(report.category_counts[&PiiCategory::Ssn], 1);
        assert!(report.filtered_text.is_none());
    }

    #[test]
    fn test_mask_mode_redacts_and_verifies() {
        let report = filter().apply("ssn 123-45-6789", FilterMode::Mask, true);
        assert_eq!(report.status, FilterStatus::Success);
        let masked = report.filtered_text.unwrap();
        assert!(!masked.contains("123-45-6789"));
        assert!(report.verification.unwrap().is_safe);
    }

    #[test]
    fn test_mask_mode_without_verification() {
        let report = filter().apply("ssn 123-45-6789", FilterMode::Mask, false);
        assert_eq!(report.status, FilterStatus::Success);
        assert!(report.verification.is_none());
    }

    #[test]
    fn test_verify_mode_safe_and_unsafe() {
        let safe = filter().apply("clean text", FilterMode::Verify, true);
        assert_eq!(safe.status, FilterStatus::Safe);

        let unsafe_report = filter().apply("ssn 123-45-6789", FilterMode::Verify, true);
        assert_eq!(unsafe_report.status, FilterStatus::Unsafe);
        assert_eq!(unsafe_report.verification.unwrap().violation_count, 1);
    }

    #[test]
    fn test_unknown_mode_is_error_report() {
        let report = filter().apply_raw("anything", "scrub", true);
        assert_eq!(report.status, FilterStatus::Error);
        assert_eq!(report.mode, "scrub");
        assert_eq!(report.error.unwrap(), "Invalid mode: scrub");
    }

    #[test]
    fn test_pii_free_text_masks_to_safe() {
        let report = filter().apply("totally ordinary text", FilterMode::Mask, true);
        assert_eq!(report.status, FilterStatus::Success);
        assert!(report.verification.unwrap().is_safe);
        assert_eq!(report.filtered_text.unwrap(), "totally ordinary text");
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = filter().apply("ssn 123-45-6789", FilterMode::Mask, true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json["originalLength"].is_number());
        assert!(json["categoryCounts"]["ssn"].is_number());
        assert!(json.get("policyApplied").is_none());
    }
}
