//! Vendor-call normalization helper.
//!
//! Operations registered by collaborator crates route their HTTP calls
//! through [`VendorClient`] so every failure — non-2xx status, transport
//! error, undecodable body — collapses into a single
//! [`ProviderFailure`] carrying the vendor's own message. The core never
//! inspects vendor-specific error bodies beyond that message. Retries
//! and timeouts are deliberately absent here; they belong to the
//! collaborator's HTTP policy, not the dispatch layer.

use serde_json::Value;

use crate::error::ProviderFailure;

/// Thin HTTP wrapper bound to one provider name.
#[derive(Debug, Clone)]
pub struct VendorClient {
    provider: String,
    http: reqwest::Client,
}

impl VendorClient {
    pub fn new(provider: impl Into<String>) -> Self {
        Self::with_client(provider, reqwest::Client::new())
    }

    /// Use a pre-built client (proxy, timeout, and TLS policy are the
    /// collaborator's concern).
    pub fn with_client(provider: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            provider: provider.into(),
            http,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// POST a JSON body and decode the JSON reply.
    pub async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value, ProviderFailure> {
        let mut request = self.http.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|source| ProviderFailure::new(&self.provider, source.to_string()))?;
        self.decode(response).await
    }

    /// GET and decode the JSON reply.
    pub async fn get_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Value, ProviderFailure> {
        let mut request = self.http.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|source| ProviderFailure::new(&self.provider, source.to_string()))?;
        self.decode(response).await
    }

    async fn decode(&self, response: reqwest::Response) -> Result<Value, ProviderFailure> {
        let status = response.status();
        let body = response.text().await.map_err(|source| {
            ProviderFailure::new(&self.provider, format!("failed to read response body: {source}"))
                .with_status(status.as_u16())
        })?;

        if !status.is_success() {
            return Err(ProviderFailure::new(&self.provider, vendor_message(&body))
                .with_status(status.as_u16()));
        }

        serde_json::from_str(&body).map_err(|source| {
            ProviderFailure::new(
                &self.provider,
                format!("vendor returned a non-JSON body: {source}"),
            )
            .with_status(status.as_u16())
        })
    }
}

/// Pull the human-readable message out of a vendor error body, falling
/// back to the raw body when no conventional field is present.
fn vendor_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for pointer in ["/message", "/error/message", "/error", "/detail"] {
            if let Some(message) = value.pointer(pointer).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_message_prefers_conventional_fields() {
        assert_eq!(vendor_message(r#"{"message": "quota exceeded"}"#), "quota exceeded");
        assert_eq!(
            vendor_message(r#"{"error": {"message": "bad key"}}"#),
            "bad key"
        );
        assert_eq!(vendor_message(r#"{"error": "bad key"}"#), "bad key");
    }

    #[test]
    fn vendor_message_falls_back_to_the_raw_body() {
        assert_eq!(vendor_message("service unavailable"), "service unavailable");
        assert_eq!(vendor_message(r#"{"code": 503}"#), r#"{"code": 503}"#);
    }
}
