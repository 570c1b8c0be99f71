//! External vendor client seam.

use crate::error::{Error, Result};
use crate::protocol::ExternalInputs;
use async_trait::async_trait;
use serde_json::{json, Value};

/// The one suspension point in the system: the call to the external
/// translation service. Everything on either side of it is synchronous.
#[async_trait]
pub trait VendorClient: Send + Sync {
    fn name(&self) -> &str;

    /// Send prepared inputs across the boundary and return the raw
    /// (untrusted) response JSON.
    async fn translate(&self, inputs: &ExternalInputs) -> Result<Value>;
}

/// HTTP vendor client posting to `{base_url}/translate`.
pub struct HttpVendorClient {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpVendorClient {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VendorClient for HttpVendorClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, inputs: &ExternalInputs) -> Result<Value> {
        let url = format!("{}/translate", self.base_url.trim_end_matches('/'));
        tracing::info!(url = %url, "Dispatching to external vendor");

        let response = self.client.post(&url).json(inputs).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Vendor(format!(
                "vendor returned HTTP {status}"
            )));
        }

        Ok(response.json().await?)
    }
}

/// In-process stand-in vendor for tests and demos.
///
/// Echoes the input text back as the translation, so masked spans pass
/// through unchanged exactly as a well-behaved vendor would preserve them.
pub struct EchoVendor;

#[async_trait]
impl VendorClient for EchoVendor {
    fn name(&self) -> &str {
        "echo"
    }

    async fn translate(&self, inputs: &ExternalInputs) -> Result<Value> {
        Ok(json!({
            "translated_text": inputs.text,
            "source_language": inputs.source_lang,
            "target_language": inputs.target_lang,
            "document_type": inputs.doc_type,
            "confidence": 0.99
        }))
    }
}
