//! Envelope <-> vendor shape transformation.
//!
//! Two pure functions bridge the boundary envelope and the external
//! service's parameter/result shapes. Both are total on valid input and
//! fail with `ValidationError` values otherwise.

use crate::error::ValidationError;
use crate::protocol::validate::{param_str, DEFAULT_CONFIDENCE, DEFAULT_DOCUMENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outbound shape the external service accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalInputs {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub doc_type: String,
}

/// Inbound result after trust repair.
///
/// `word_count` is always derived locally from the translated text,
/// never trusted from the external side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub document_type: String,
    pub word_count: usize,
    pub confidence: f64,
}

/// Reshape envelope parameters into the vendor's input format.
///
/// Collects every missing required field into one `MissingParameter`
/// error rather than reporting only the first.
pub fn to_external(parameters: &Map<String, Value>) -> Result<ExternalInputs, ValidationError> {
    let required = ["text", "source_language", "target_language"];
    let missing: Vec<String> = required
        .iter()
        .filter(|name| param_str(parameters, name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingParameter(missing));
    }

    let inputs = ExternalInputs {
        text: param_str(parameters, "text").unwrap_or_default().to_string(),
        source_lang: param_str(parameters, "source_language")
            .unwrap_or_default()
            .to_string(),
        target_lang: param_str(parameters, "target_language")
            .unwrap_or_default()
            .to_string(),
        doc_type: param_str(parameters, "document_type")
            .unwrap_or(DEFAULT_DOCUMENT_TYPE)
            .to_string(),
    };

    tracing::info!(
        source = %inputs.source_lang,
        target = %inputs.target_lang,
        text_length = inputs.text.chars().count(),
        "Transformed envelope parameters to vendor inputs"
    );

    Ok(inputs)
}

/// Repair and reshape the vendor's raw result into the envelope shape.
///
/// Requires a non-null string `translated_text`; everything else is
/// advisory and defaulted when absent.
pub fn from_external(raw: &Value) -> Result<TranslationResult, ValidationError> {
    let translated_text = raw
        .get("translated_text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ValidationError::MalformedResult("missing 'translated_text' field".to_string())
        })?
        .to_string();

    let word_count = translated_text.split_whitespace().count();

    let str_or = |field: &str, default: &str| {
        raw.get(field)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    let result = TranslationResult {
        word_count,
        confidence: raw
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_CONFIDENCE),
        source_language: str_or("source_language", "unknown"),
        target_language: str_or("target_language", "unknown"),
        document_type: str_or("document_type", DEFAULT_DOCUMENT_TYPE),
        translated_text,
    };

    tracing::info!(
        word_count = result.word_count,
        confidence = result.confidence,
        "Transformed vendor result to envelope shape"
    );

    Ok(result)
}
