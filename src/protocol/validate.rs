//! Pre-flight request validation and the boundary constants.
//!
//! These checks run before any network call. The transformer repeats the
//! required-parameter check on its own inputs; the duplication is defense
//! in depth at the trust boundary, not an accident.

use crate::error::ValidationError;
use serde_json::{Map, Value};

/// The single supported capability.
pub const CAPABILITY_TRANSLATE: &str = "translate_document";

/// Parameters every `translate_document` request must carry.
pub const REQUIRED_PARAMETERS: [&str; 3] = ["text", "source_language", "target_language"];

/// Maximum accepted text length, in characters.
pub const MAX_TEXT_LENGTH: usize = 50_000;

/// Supported ISO 639-1 language codes.
pub const SUPPORTED_LANGUAGES: [&str; 9] = ["es", "en", "pl", "he", "uk", "ru", "fr", "de", "it"];

/// Document types advertised in the capability card. The validator does
/// not enforce membership; unknown types resolve to the general policy
/// downstream.
pub const DOCUMENT_TYPES: [&str; 7] = [
    "birth_certificate",
    "passport",
    "visa",
    "tax_form",
    "medical_record",
    "legal_document",
    "general",
];

/// Default document type when the caller omits one.
pub const DEFAULT_DOCUMENT_TYPE: &str = "general";

/// Confidence reported when the vendor omits one.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Validate an inbound envelope before any external call.
///
/// Check order is fixed for deterministic error messages:
/// capability, then required-field presence (all missing fields listed),
/// then size, then language enum membership (source before target).
pub fn validate_request(
    capability: &str,
    parameters: &Map<String, Value>,
) -> Result<(), ValidationError> {
    if capability != CAPABILITY_TRANSLATE {
        return Err(ValidationError::UnknownCapability(capability.to_string()));
    }

    let missing: Vec<String> = REQUIRED_PARAMETERS
        .iter()
        .filter(|name| param_str(parameters, name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingParameter(missing));
    }

    let text = param_str(parameters, "text").unwrap_or_default();
    let length = text.chars().count();
    if length > MAX_TEXT_LENGTH {
        return Err(ValidationError::PayloadTooLarge {
            length,
            max: MAX_TEXT_LENGTH,
        });
    }

    for field in ["source_language", "target_language"] {
        let code = param_str(parameters, field).unwrap_or_default();
        if !SUPPORTED_LANGUAGES.contains(&code) {
            return Err(ValidationError::InvalidEnum {
                field: field.to_string(),
                value: code.to_string(),
            });
        }
    }

    tracing::info!(capability, "Boundary request validated");
    Ok(())
}

/// String parameter lookup; non-string values count as absent.
pub(crate) fn param_str<'a>(parameters: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    parameters.get(name).and_then(Value::as_str)
}
