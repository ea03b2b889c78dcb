//! reqwest-backed generation clients.

use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, error};

use super::{parse_envelope, GenerationClient};
use crate::config::GenerationConfig;
use crate::errors::{DecisionflowError, StageError, TransportError};

fn http_client(config: &GenerationConfig) -> crate::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| DecisionflowError::Config(format!("failed to build HTTP client: {e}")))
}

/// Sends a prepared request and turns the response into generated text.
async fn send(request: reqwest::RequestBuilder, target: &str) -> Result<String, StageError> {
    let start = Instant::now();

    let response = request
        .send()
        .await
        .map_err(|e| TransportError::network(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TransportError::network(format!("failed to read response body: {e}")))?;

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    if !status.is_success() {
        error!(
            target_endpoint = %target,
            status = status.as_u16(),
            duration_ms,
            details = %body,
            "Generation endpoint returned an error"
        );
        return Err(TransportError::http(status.as_u16(), body).into());
    }

    let text = parse_envelope(&body)?;
    debug!(
        target_endpoint = %target,
        duration_ms,
        response_chars = text.chars().count(),
        "Generation response received"
    );
    Ok(text)
}

/// Client for a reverse proxy that forwards `{prompt}` to the provider.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ProxyClient {
    /// Creates a proxy client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &GenerationConfig) -> crate::Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl GenerationClient for ProxyClient {
    async fn generate(&self, prompt: &str) -> Result<String, StageError> {
        debug!(endpoint = %self.endpoint, prompt_chars = prompt.chars().count(), "Sending prompt to proxy");
        let request = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "prompt": prompt }));
        send(request, &self.endpoint).await
    }

    fn describe(&self) -> String {
        format!("proxy {}", self.endpoint)
    }
}

/// Client that calls the messages API directly.
#[derive(Clone)]
pub struct DirectClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    anthropic_version: String,
}

impl std::fmt::Debug for DirectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl DirectClient {
    /// Creates a direct client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no API key is set or the HTTP client
    /// cannot be built.
    pub fn new(config: &GenerationConfig) -> crate::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DecisionflowError::Config("direct mode requires an API key".into()))?;

        Ok(Self {
            http: http_client(config)?,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            anthropic_version: config.anthropic_version.clone(),
        })
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        })
    }
}

#[async_trait]
impl GenerationClient for DirectClient {
    async fn generate(&self, prompt: &str) -> Result<String, StageError> {
        debug!(endpoint = %self.endpoint, model = %self.model, prompt_chars = prompt.chars().count(), "Sending prompt to provider");
        let request = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.anthropic_version)
            .json(&self.request_body(prompt));
        send(request, &self.endpoint).await
    }

    fn describe(&self) -> String {
        format!("direct {} ({})", self.endpoint, self.model)
    }
}
