//! HTTP transport for the Meridian REST API.
//!
//! Epistemic foundation:
//! - K_i: Every resource path hangs off the organization base path
//! - B_i: The API will respond within the timeout (might fail)
//! - B_i: The response body will be JSON (might fail)
//!
//! The transport returns non-2xx statuses as data; resource clients decide
//! which statuses map to typed errors. Only socket-level failures surface
//! as `Network` errors here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::models::{ClientConfig, MeridianError, Result};

/// Status and decoded JSON body of an API response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body into a typed value.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.body)
            .map_err(|e| MeridianError::Parse(format!("decoding response body: {e}")))
    }

    /// Turn this response into the generic non-2xx error.
    pub fn into_request_failed(self) -> MeridianError {
        MeridianError::request_failed(self.status, self.body.to_string())
    }
}

/// The HTTP-like request interface the resource clients consume.
///
/// Implementations must be safe for concurrent use; clients share one
/// transport handle across all operations.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpResponse>;

    async fn post(
        &self,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse>;

    async fn patch(&self, path: &str, body: Option<Value>) -> Result<HttpResponse>;
}

/// reqwest-backed transport bound to one organization.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport from the client configuration.
    ///
    /// B_i(api key available) → Result
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| MeridianError::Internal(format!("invalid API key header: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(MeridianError::Network)?;

        Ok(Self {
            client,
            base_url: config.organization_base_path(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<HttpResponse> {
        let response = request.send().await.map_err(MeridianError::Network)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(MeridianError::Network)?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!(status = status, "API response");
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpResponse> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    async fn post(
        &self,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse> {
        let mut request = self.client.post(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        self.execute(request).await
    }

    async fn patch(&self, path: &str, body: Option<Value>) -> Result<HttpResponse> {
        let mut request = self.client.patch(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.execute(request).await
    }
}
