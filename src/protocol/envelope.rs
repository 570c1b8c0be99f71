//! Boundary envelope wire types.
//!
//! The generic request/response wrapper exchanged at the protocol
//! boundary, independent of transport.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound invocation envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryRequest {
    /// Capability name to invoke
    pub capability: String,
    /// Parameters for the capability
    pub parameters: Map<String, Value>,
    /// Additional caller context, passed through untouched
    #[serde(default)]
    pub context: Map<String, Value>,
}

/// Envelope status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Outbound result envelope.
///
/// Protocol-level failures are payload, not transport, errors: every
/// invocation produces one of these with HTTP 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryResponse {
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

impl BoundaryResponse {
    pub fn success(result: Value, metadata: Value) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            result: Some(result),
            error: None,
            metadata,
        }
    }

    pub fn error(message: impl Into<String>, metadata: Value) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            result: None,
            error: Some(message.into()),
            metadata,
        }
    }
}
