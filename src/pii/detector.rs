//! Regex-based PII detection.

use crate::pii::rules::{PiiCategory, RuleSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-category matched literals.
///
/// Key order is rule-table order (via `PiiCategory`'s derived `Ord`);
/// values are matched literals in document order with duplicates kept,
/// since every occurrence must be masked individually.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult(BTreeMap<PiiCategory, Vec<String>>);

impl DetectionResult {
    pub fn insert(&mut self, category: PiiCategory, matches: Vec<String>) {
        if !matches.is_empty() {
            self.0.insert(category, matches);
        }
    }

    pub fn get(&self, category: PiiCategory) -> Option<&[String]> {
        self.0.get(&category).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PiiCategory, &[String])> {
        self.0.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    /// Categories with at least one hit, in rule-table order.
    pub fn categories(&self) -> Vec<PiiCategory> {
        self.0.keys().copied().collect()
    }

    /// Instance count per category.
    pub fn counts(&self) -> BTreeMap<PiiCategory, usize> {
        self.0.iter().map(|(c, v)| (*c, v.len())).collect()
    }

    /// Total matched instances across all categories.
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into (allowed, to-mask) partitions by category membership.
    pub fn partition<F>(&self, allowed: F) -> (DetectionResult, DetectionResult)
    where
        F: Fn(PiiCategory) -> bool,
    {
        let mut keep = DetectionResult::default();
        let mut mask = DetectionResult::default();
        for (category, matches) in &self.0 {
            if allowed(*category) {
                keep.insert(*category, matches.clone());
            } else {
                mask.insert(*category, matches.clone());
            }
        }
        (keep, mask)
    }
}

/// Scans free text against the rule table.
///
/// Pure apart from one audit log line per detected category. Cross-category
/// overlaps are not de-duplicated; each rule fires independently.
#[derive(Clone)]
pub struct Detector {
    rules: Arc<RuleSet>,
}

impl Detector {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Find all non-overlapping matches per rule, in document order.
    ///
    /// Rules whose pattern carries capture groups report each match as the
    /// concatenation of its captured groups, trimmed, rather than the full
    /// span. Empty flattened matches are discarded.
    pub fn detect(&self, text: &str) -> DetectionResult {
        let mut result = DetectionResult::default();

        for (category, regex) in self.rules.rules() {
            let matches: Vec<String> = if regex.captures_len() > 1 {
                regex
                    .captures_iter(text)
                    .filter_map(|caps| {
                        let joined: String = caps
                            .iter()
                            .skip(1)
                            .flatten()
                            .map(|m| m.as_str())
                            .collect();
                        let trimmed = joined.trim().to_string();
                        (!trimmed.is_empty()).then_some(trimmed)
                    })
                    .collect()
            } else {
                regex
                    .find_iter(text)
                    .map(|m| m.as_str().to_string())
                    .collect()
            };

            if !matches.is_empty() {
                tracing::info!(
                    category = %category,
                    count = matches.len(),
                    "Detected PII instances"
                );
                result.insert(*category, matches);
            }
        }

        result
    }
}
