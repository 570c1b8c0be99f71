//! Capability discovery document.
//!
//! Served at `/.well-known/agent-card.json`; the "front door" consumers
//! read to learn what the gate accepts. Rendered from the same constants
//! the validator enforces so the two cannot drift.

use crate::protocol::validate::{
    CAPABILITY_TRANSLATE, DEFAULT_DOCUMENT_TYPE, DOCUMENT_TYPES, MAX_TEXT_LENGTH,
    REQUIRED_PARAMETERS, SUPPORTED_LANGUAGES,
};
use serde_json::{json, Value};

/// Build the capability card JSON.
pub fn capability_card() -> Value {
    json!({
        "schema_version": "1.0",
        "name": "docgate",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Boundary-filtered document translation gate. Detects and masks \
                        PII before text leaves the trusted domain, validates the protocol \
                        envelope, and verifies vendor responses for leaks.",
        "capabilities": [
            {
                "name": CAPABILITY_TRANSLATE,
                "description": "Translate a document between supported languages. Text is \
                                PII-filtered under the document-type policy before it \
                                reaches the vendor; masked spans are preserved unchanged.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "text": {
                            "type": "string",
                            "description": "Document text to translate"
                        },
                        "source_language": {
                            "type": "string",
                            "description": "Source language code (ISO 639-1)",
                            "enum": SUPPORTED_LANGUAGES
                        },
                        "target_language": {
                            "type": "string",
                            "description": "Target language code (ISO 639-1)",
                            "enum": SUPPORTED_LANGUAGES
                        },
                        "document_type": {
                            "type": "string",
                            "description": "Type of document being translated",
                            "enum": DOCUMENT_TYPES,
                            "default": DEFAULT_DOCUMENT_TYPE
                        }
                    },
                    "required": REQUIRED_PARAMETERS
                },
                "returns": {
                    "type": "object",
                    "properties": {
                        "translated_text": { "type": "string" },
                        "source_language": { "type": "string" },
                        "target_language": { "type": "string" },
                        "document_type": { "type": "string" },
                        "word_count": { "type": "integer" },
                        "confidence": { "type": "number" }
                    }
                }
            }
        ],
        "endpoints": {
            "invoke": "/invoke"
        },
        "authentication": {
            "type": "none"
        },
        "metadata": {
            "pii_handling": "Masked before dispatch, verified on return",
            "supported_formats": ["text"],
            "max_text_length": MAX_TEXT_LENGTH
        }
    })
}
