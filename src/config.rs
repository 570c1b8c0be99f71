//! Docgate configuration management

use crate::pii::{default_pii_rules, PiiRule};
use crate::policy::{default_policies, DocumentPolicy};
use serde::{Deserialize, Serialize};

/// Main docgate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// PII filter configuration
    #[serde(default)]
    pub filter: FilterConfig,

    /// External vendor configuration
    #[serde(default)]
    pub vendor: VendorConfig,
}

impl GateConfig {
    /// Parse configuration from a JSON string.
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = allow any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18890,
            cors_origins: Vec::new(),
        }
    }
}

/// PII filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Detection rule table, evaluated in order
    pub rules: Vec<PiiRule>,

    /// Document-type security policies
    pub policies: Vec<DocumentPolicy>,

    /// Residual instances tolerated by post-mask verification
    pub verify_threshold: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            rules: default_pii_rules(),
            policies: default_policies(),
            verify_threshold: 0,
        }
    }
}

/// External vendor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Vendor display name reported in response metadata
    pub name: String,

    /// Base URL of the vendor HTTP service. When unset, the in-process
    /// echo vendor is used (demo/test mode).
    pub base_url: Option<String>,

    /// Advisory length-ratio bounds for translated output
    pub length_ratio_min: f64,
    pub length_ratio_max: f64,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            name: "docs-translator".to_string(),
            base_url: None,
            length_ratio_min: 0.5,
            length_ratio_max: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pii::PiiCategory;

    #[test]
    fn test_default_config_is_complete() {
        let config = GateConfig::default();
        assert_eq!(config.server.port, 18890);
        assert_eq!(config.filter.rules.len(), 7);
        assert_eq!(config.filter.verify_threshold, 0);
        assert!(config.vendor.base_url.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GateConfig::from_json(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.filter.rules.is_empty());
    }

    #[test]
    fn test_custom_rules_deserialize() {
        let config = GateConfig::from_json(
            r#"{"filter": {"rules": [{"category": "email", "pattern": "[a-z]+@[a-z]+\\.com"}]}}"#,
        )
        .unwrap();
        assert_eq!(config.filter.rules.len(), 1);
        assert_eq!(config.filter.rules[0].category, PiiCategory::Email);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(GateConfig::from_json("{{{ nope").is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = GateConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = GateConfig::from_json(&json).unwrap();
        assert_eq!(back.filter.policies.len(), config.filter.policies.len());
    }
}
