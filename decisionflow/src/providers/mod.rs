//! Generation clients.
//!
//! [`GenerationClient`] is the only I/O boundary of the pipeline: one prompt
//! in, one text out, a single attempt with no retry. Tests substitute it with
//! [`ScriptedGenerationClient`](crate::testing::ScriptedGenerationClient) or
//! the mockall-generated `MockGenerationClient`.

mod envelope;
#[cfg(feature = "http")]
mod http;

use async_trait::async_trait;
use serde::Serialize;
#[cfg(feature = "http")]
use std::sync::Arc;

pub use envelope::{extract_text, parse_envelope};
#[cfg(feature = "http")]
pub use http::{DirectClient, ProxyClient};

use crate::config::{GenerationConfig, GenerationMode};
use crate::errors::StageError;

/// Sends one prompt to the text-generation capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generates text for `prompt`.
    ///
    /// # Errors
    ///
    /// `StageError::Transport` on a non-success status (with the status code)
    /// or a network-level failure (status 0); `StageError::Format` when a
    /// success response lacks the expected text.
    async fn generate(&self, prompt: &str) -> Result<String, StageError>;

    /// Short description for logs, e.g. `proxy http://localhost:3000/api/claude`.
    fn describe(&self) -> String;
}

/// Builds the client selected by `config.mode`.
///
/// # Errors
///
/// Returns a configuration error if the config is invalid or the HTTP client
/// cannot be constructed.
#[cfg(feature = "http")]
pub fn build_client(config: &GenerationConfig) -> crate::Result<Arc<dyn GenerationClient>> {
    config.validate()?;
    let client: Arc<dyn GenerationClient> = match config.mode {
        GenerationMode::Proxy => Arc::new(ProxyClient::new(config)?),
        GenerationMode::Direct => Arc::new(DirectClient::new(config)?),
    };
    Ok(client)
}

/// Readiness snapshot of the generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Human-readable status line.
    pub message: String,
    /// When the report was produced (RFC 3339).
    pub timestamp: String,
    /// Whether an API key is configured.
    pub has_api_key: bool,
    /// Transport mode in use.
    pub mode: GenerationMode,
    /// Endpoint generation calls go to.
    pub endpoint: String,
}

impl HealthReport {
    /// Builds a report from configuration alone; performs no I/O.
    #[must_use]
    pub fn from_config(config: &GenerationConfig) -> Self {
        let message = match config.validate() {
            Ok(()) => "Generation client is configured".to_string(),
            Err(e) => e.to_string(),
        };
        Self {
            message,
            timestamp: crate::utils::iso_timestamp(),
            has_api_key: config.has_api_key(),
            mode: config.mode,
            endpoint: config.endpoint.clone(),
        }
    }
}
