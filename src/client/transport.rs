use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::delete::DeleteError;

/// Raw reply to a POST, before any interpretation of the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends JSON bodies to the gallery server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `path`, relative to the server root.
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse, DeleteError>;
}

/// reqwest-backed transport bound to one server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, DeleteError> {
        self.base_url
            .join(path)
            .map_err(|e| DeleteError::TransportFailure(format!("invalid endpoint '{}': {}", path, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse, DeleteError> {
        let url = self.endpoint(path)?;
        let payload = serde_json::to_vec(body)
            .map_err(|e| DeleteError::TransportFailure(format!("failed to encode request: {}", e)))?;

        // The body goes out as raw JSON text; no content-type header is set
        let response = self
            .client
            .post(url)
            .body(payload)
            .send()
            .await
            .map_err(|e| DeleteError::TransportFailure(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DeleteError::TransportFailure(e.to_string()))?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_against_server_root() {
        let base = Url::parse("http://camera.local:5000").unwrap();
        let transport = HttpTransport::new(base, None).unwrap();
        assert_eq!(
            transport.endpoint("/deletephoto").unwrap().as_str(),
            "http://camera.local:5000/deletephoto"
        );
    }

    #[test]
    fn test_response_success_range() {
        assert!(TransportResponse::new(200, "{}").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(400, "{}").is_success());
        assert!(!TransportResponse::new(500, "").is_success());
    }
}
