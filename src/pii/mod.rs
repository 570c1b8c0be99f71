//! PII detection, masking, and verification engines.

pub mod detector;
pub mod masker;
pub mod rules;
pub mod verifier;

pub use detector::{DetectionResult, Detector};
pub use masker::{mask_value, MaskOutcome, Masker};
pub use rules::{default_pii_rules, PiiCategory, PiiRule, RuleSet, MASK_CHAR};
pub use verifier::{Verification, Verifier};
