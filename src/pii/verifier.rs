//! Post-masking leak verification.

use crate::pii::detector::{DetectionResult, Detector};
use serde::Serialize;

/// Outcome of a verification pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub is_safe: bool,
    pub detected: DetectionResult,
    pub violation_count: usize,
    pub threshold: usize,
}

/// Re-runs detection on (typically already-masked) text and compares the
/// hit count against a threshold. Stateless and idempotent; used both as
/// a post-mask self-check and as a standalone guard at the trust boundary.
#[derive(Clone)]
pub struct Verifier {
    detector: Detector,
}

impl Verifier {
    pub fn new(detector: Detector) -> Self {
        Self { detector }
    }

    pub fn verify(&self, text: &str, threshold: usize) -> Verification {
        let detected = self.detector.detect(text);
        let violation_count = detected.total();
        let is_safe = violation_count <= threshold;

        if is_safe {
            tracing::info!("PII verification passed: no sensitive data above threshold");
        } else {
            tracing::warn!(
                violations = violation_count,
                threshold,
                "PII verification failed: residual instances detected"
            );
        }

        Verification {
            is_safe,
            detected,
            violation_count,
            threshold,
        }
    }
}
