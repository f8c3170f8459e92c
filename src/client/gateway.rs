//! OpenAI-compatible completion gateway.
//!
//! Epistemic foundation:
//! - K_i: The OpenAI chat completions schema is the de facto standard
//! - K_i: Routed execution is a completion request whose model id names a
//!   versioned router; the routing decision is opaque to the client
//! - B_i: The gateway will respond within the timeout (might fail)
//!
//! The gateway does not retry. Failures surface verbatim; retry semantics
//! belong to the caller or the server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use crate::models::{ChatCompletion, ClientConfig, CompletionCreateParams, MeridianError, Result};

/// The completion-execution interface router runs go through.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Issue a completion for `model`, with `extra_body` keys merged into
    /// the request payload.
    async fn complete(
        &self,
        model: &str,
        params: &CompletionCreateParams,
        extra_body: &Value,
        timeout: Option<Duration>,
    ) -> Result<ChatCompletion>;
}

/// reqwest-backed gateway against `{gateway_url}/chat/completions`.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let mut headers = HeaderMap::new();
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
            base_url: config.effective_gateway_url(),
        })
    }

    /// Merge params, the effective model id, and extra body keys into one
    /// request payload.
    fn build_body(
        model: &str,
        params: &CompletionCreateParams,
        extra_body: &Value,
    ) -> Result<Value> {
        let mut body = serde_json::to_value(params)
            .map_err(|e| MeridianError::Parse(format!("serializing completion params: {e}")))?;
        let obj = body
            .as_object_mut()
            .ok_or_else(|| MeridianError::Internal("completion params must be an object".to_string()))?;

        obj.insert("model".to_string(), Value::String(model.to_string()));

        if let Some(extra) = extra_body.as_object() {
            for (key, value) in extra {
                obj.insert(key.clone(), value.clone());
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl CompletionGateway for HttpGateway {
    async fn complete(
        &self,
        model: &str,
        params: &CompletionCreateParams,
        extra_body: &Value,
        timeout: Option<Duration>,
    ) -> Result<ChatCompletion> {
        let body = Self::build_body(model, params, extra_body)?;
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = model, "Issuing completion request");

        let mut request = self.client.post(&url).json(&body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(MeridianError::Network)?;
        let status = response.status().as_u16();

        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(MeridianError::request_failed(status, body));
        }

        response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| MeridianError::Parse(format!("decoding completion response: {e}")))
    }
}
