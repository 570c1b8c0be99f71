//! Boundary gateway: the full trusted → external → trusted flow.
//!
//! Composes the validator, policy engine, transformers, vendor client,
//! and verifier along the data flow for the `translate_document`
//! capability. No failure inside `invoke` is fatal: every error path
//! becomes a status-`error` envelope.

use crate::error::Error;
use crate::pii::Verifier;
use crate::policy::PolicyEngine;
use crate::protocol::{
    from_external, to_external, validate_request, BoundaryRequest, BoundaryResponse,
    TranslationResult, DEFAULT_DOCUMENT_TYPE,
};
use crate::vendor::VendorClient;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Outcome of one advisory response check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// Pluggable post-translation sanity check.
///
/// Checks are advisory only: a failed check is reported in the response
/// metadata but never blocks the result.
pub trait ResponseCheck: Send + Sync {
    fn check(&self, sent_text: &str, result: &TranslationResult) -> CheckOutcome;
}

/// Flags translations whose length falls outside a plausible ratio of
/// the submitted text. The bounds are translation-specific policy, so
/// they are configurable rather than baked in.
pub struct LengthRatioCheck {
    pub min: f64,
    pub max: f64,
}

impl Default for LengthRatioCheck {
    fn default() -> Self {
        Self { min: 0.5, max: 2.0 }
    }
}

impl ResponseCheck for LengthRatioCheck {
    fn check(&self, sent_text: &str, result: &TranslationResult) -> CheckOutcome {
        let sent = sent_text.chars().count().max(1) as f64;
        let got = result.translated_text.chars().count() as f64;
        let ratio = got / sent;
        let passed = ratio >= self.min && ratio <= self.max;

        if !passed {
            tracing::warn!(ratio, "Translation length ratio outside expected bounds");
        }

        CheckOutcome {
            name: "length_ratio".to_string(),
            passed,
            detail: format!("ratio {:.2} (expected {:.1}-{:.1})", ratio, self.min, self.max),
        }
    }
}

/// Gateway composing the boundary components end to end.
pub struct BoundaryGateway {
    policy: Arc<PolicyEngine>,
    verifier: Verifier,
    vendor: Arc<dyn VendorClient>,
    checks: Vec<Box<dyn ResponseCheck>>,
}

impl BoundaryGateway {
    pub fn new(
        policy: Arc<PolicyEngine>,
        verifier: Verifier,
        vendor: Arc<dyn VendorClient>,
    ) -> Self {
        Self {
            policy,
            verifier,
            vendor,
            checks: vec![Box::new(LengthRatioCheck::default())],
        }
    }

    pub fn with_checks(mut self, checks: Vec<Box<dyn ResponseCheck>>) -> Self {
        self.checks = checks;
        self
    }

    /// Execute one invocation: validate, mask under policy, transform
    /// outbound, call the vendor, transform inbound, verify for leaks.
    pub async fn invoke(&self, request: BoundaryRequest) -> BoundaryResponse {
        tracing::info!(capability = %request.capability, "Boundary invoke received");

        if let Err(e) = validate_request(&request.capability, &request.parameters) {
            tracing::warn!(error = %e, "Request rejected at validation");
            return BoundaryResponse::error(e.to_string(), self.base_metadata());
        }

        // Mask PII under the document-type policy before anything leaves
        // the trusted domain.
        let text = request
            .parameters
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let document_type = request
            .parameters
            .get("document_type")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_DOCUMENT_TYPE);
        let filter_report = self.policy.apply(text, document_type);
        let filtered_text = filter_report.filtered_text.clone().unwrap_or_default();

        let mut outbound = request.parameters.clone();
        outbound.insert("text".to_string(), json!(filtered_text));

        let inputs = match to_external(&outbound) {
            Ok(inputs) => inputs,
            Err(e) => return BoundaryResponse::error(e.to_string(), self.base_metadata()),
        };

        let raw = match self.vendor.translate(&inputs).await {
            Ok(raw) => raw,
            Err(e) => {
                let message = match e {
                    Error::Vendor(m) => format!("Vendor error: {m}"),
                    other => format!("Vendor error: {other}"),
                };
                tracing::error!(error = %message, "External call failed");
                return BoundaryResponse::error(message, self.base_metadata());
            }
        };

        let result = match from_external(&raw) {
            Ok(result) => result,
            Err(e) => return BoundaryResponse::error(e.to_string(), self.base_metadata()),
        };

        // Nothing the vendor returns is trusted until re-verified.
        let verification = self.verifier.verify(&result.translated_text, 0);
        let checks: Vec<CheckOutcome> = self
            .checks
            .iter()
            .map(|c| c.check(&inputs.text, &result))
            .collect();

        let mut metadata = self.base_metadata();
        if let Value::Object(ref mut map) = metadata {
            map.insert(
                "policy_applied".to_string(),
                json!(filter_report.policy_applied),
            );
            map.insert("pii_masked".to_string(), json!(filter_report.category_counts));
            map.insert(
                "pii_allowed".to_string(),
                json!(filter_report.allowed_counts),
            );
            map.insert(
                "verification".to_string(),
                json!({
                    "isSafe": verification.is_safe,
                    "violationCount": verification.violation_count,
                    "threshold": verification.threshold,
                }),
            );
            if !checks.is_empty() {
                map.insert("checks".to_string(), json!(checks));
            }
        }

        tracing::info!(
            word_count = result.word_count,
            leak_safe = verification.is_safe,
            "Invocation completed"
        );

        BoundaryResponse::success(json!(result), metadata)
    }

    fn base_metadata(&self) -> Value {
        json!({ "vendor": self.vendor.name() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pii::{default_pii_rules, Detector, RuleSet};
    use crate::policy::{default_policies, PolicyTable};
    use crate::protocol::EnvelopeStatus;
    use crate::vendor::EchoVendor;
    use serde_json::Map;

    fn gateway() -> BoundaryGateway {
        let rules = Arc::new(RuleSet::compile(&default_pii_rules()).unwrap());
        let detector = Detector::new(rules);
        let policy = Arc::new(PolicyEngine::new(
            detector.clone(),
            PolicyTable::new(default_policies()).unwrap(),
        ));
        BoundaryGateway::new(policy, Verifier::new(detector), Arc::new(EchoVendor))
    }

    fn request(text: &str, document_type: Option<&str>) -> BoundaryRequest {
        let mut parameters = Map::new();
        parameters.insert("text".to_string(), json!(text));
        parameters.insert("source_language".to_string(), json!("es"));
        parameters.insert("target_language".to_string(), json!("en"));
        if let Some(dt) = document_type {
            parameters.insert("document_type".to_string(), json!(dt));
        }
        BoundaryRequest {
            capability: "translate_document".to_string(),
            parameters,
            context: Map::new(),
        }
    }

    #[tokio::test]
    async fn test_invoke_masks_before_vendor() {
        let response = gateway()
            .invoke(request("ssn 123-45-6789 in the form", None))
            .await;

        assert_eq!(response.status, EnvelopeStatus::Success);
        let result = response.result.unwrap();
        let translated = result["translated_text"].as_str().unwrap();
        assert!(!translated.contains("123-45-6789"));
        assert_eq!(response.metadata["pii_masked"]["ssn"], 1);
        assert_eq!(response.metadata["verification"]["isSafe"], true);
    }

    #[tokio::test]
    async fn test_invoke_respects_policy_allow_list() {
        let response = gateway()
            .invoke(request(
                "Nacido el 15 de marzo, 1985",
                Some("birth_certificate"),
            ))
            .await;

        let result = response.result.unwrap();
        let translated = result["translated_text"].as_str().unwrap();
        assert!(translated.contains("15 de marzo, 1985"));
        assert_eq!(response.metadata["pii_allowed"]["date_of_birth"], 1);
        assert_eq!(response.metadata["policy_applied"], "birth_certificate");
    }

    #[tokio::test]
    async fn test_invoke_rejects_invalid_request() {
        let mut req = request("hola", None);
        req.capability = "unknown_capability".to_string();
        let response = gateway().invoke(req).await;

        assert_eq!(response.status, EnvelopeStatus::Error);
        assert!(response
            .error
            .unwrap()
            .contains("Unknown capability: unknown_capability"));
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn test_invoke_derives_word_count() {
        let response = gateway().invoke(request("uno dos tres", None)).await;
        let result = response.result.unwrap();
        assert_eq!(result["word_count"], 3);
    }

    #[tokio::test]
    async fn test_length_ratio_check_reported() {
        let response = gateway().invoke(request("texto normal", None)).await;
        let checks = response.metadata["checks"].as_array().unwrap();
        assert_eq!(checks[0]["name"], "length_ratio");
        assert_eq!(checks[0]["passed"], true);
    }

    #[test]
    fn test_length_ratio_flags_truncated_result() {
        let check = LengthRatioCheck::default();
        let result = TranslationResult {
            translated_text: "x".to_string(),
            source_language: "es".to_string(),
            target_language: "en".to_string(),
            document_type: "general".to_string(),
            word_count: 1,
            confidence: 0.9,
        };
        let outcome = check.check("a reasonably long source document", &result);
        assert!(!outcome.passed);
    }
}
