//! Configuration types for generation clients and the orchestrator.
//!
//! Every field has a serde default, so a partial JSON file is valid. Values
//! resolve in order: defaults, then the file, then environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::{DecisionflowError, Result};

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
/// Environment variable overriding the generation endpoint.
pub const ENDPOINT_ENV: &str = "DECISIONFLOW_ENDPOINT";
/// Environment variable overriding the inter-stage delay.
pub const DELAY_ENV: &str = "DECISIONFLOW_DELAY_MS";

/// How the generation client reaches the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// POST `{prompt}` to a reverse proxy that holds the credentials.
    #[default]
    Proxy,
    /// Call the messages API directly with an API key.
    Direct,
}

/// Configuration for the generation client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Proxy URL or messages API URL, depending on `mode`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Transport mode.
    #[serde(default)]
    pub mode: GenerationMode,
    /// API key, only used in `Direct` mode.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier, only used in `Direct` mode.
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens per response, only used in `Direct` mode.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API version header, only used in `Direct` mode.
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
    /// Optional request deadline. `None` waits as long as the transport does.
    #[serde(default)]
    pub timeout_seconds: Option<f64>,
}

fn default_endpoint() -> String {
    "http://localhost:3000/api/claude".to_string()
}

fn default_direct_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-0".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            mode: GenerationMode::default(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            anthropic_version: default_anthropic_version(),
            timeout_seconds: None,
        }
    }
}

impl GenerationConfig {
    /// Creates a proxy configuration pointing at `endpoint`.
    #[must_use]
    pub fn proxy(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Creates a direct configuration with the given API key.
    #[must_use]
    pub fn direct(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: default_direct_endpoint(),
            mode: GenerationMode::Direct,
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Switches to direct mode, keeping the other settings.
    ///
    /// A still-default proxy endpoint is replaced by the messages API URL.
    #[must_use]
    pub fn into_direct(mut self) -> Self {
        self.mode = GenerationMode::Direct;
        if self.endpoint == default_endpoint() {
            self.endpoint = default_direct_endpoint();
        }
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request deadline.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Gets the deadline as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs_f64)
    }

    /// Returns true if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `DecisionflowError::Config` on an empty endpoint, a missing key
    /// in direct mode, or a non-positive timeout.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(DecisionflowError::Config("endpoint must not be empty".into()));
        }
        if self.mode == GenerationMode::Direct && !self.has_api_key() {
            return Err(DecisionflowError::Config(format!(
                "direct mode requires an API key (set {API_KEY_ENV})"
            )));
        }
        if let Some(t) = self.timeout_seconds {
            if !(t.is_finite() && t > 0.0) {
                return Err(DecisionflowError::Config(format!(
                    "timeout_seconds must be positive, got {t}"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for the pipeline orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Pause between stages, for pacing status updates. Zero disables it.
    #[serde(default = "default_inter_stage_delay_ms")]
    pub inter_stage_delay_ms: u64,
}

fn default_inter_stage_delay_ms() -> u64 {
    1500
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            inter_stage_delay_ms: default_inter_stage_delay_ms(),
        }
    }
}

impl OrchestratorConfig {
    /// Creates a configuration with the given delay.
    #[must_use]
    pub fn with_delay_ms(ms: u64) -> Self {
        Self {
            inter_stage_delay_ms: ms,
        }
    }

    /// Creates a configuration with no pacing delay.
    #[must_use]
    pub fn immediate() -> Self {
        Self::with_delay_ms(0)
    }

    /// Gets the delay as a Duration.
    #[must_use]
    pub fn inter_stage_delay(&self) -> Duration {
        Duration::from_millis(self.inter_stage_delay_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation client settings.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Orchestrator settings.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

impl AppConfig {
    /// Loads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Applies environment overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `DecisionflowError::Config` if an override cannot be parsed.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `DecisionflowError::Config` if an override cannot be parsed.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.generation.endpoint = endpoint;
        }
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.generation.api_key = Some(key);
        }
        if let Some(delay) = lookup(DELAY_ENV) {
            self.orchestrator.inter_stage_delay_ms = delay.trim().parse().map_err(|_| {
                DecisionflowError::Config(format!("{DELAY_ENV} must be an integer, got '{delay}'"))
            })?;
        }
        Ok(self)
    }

    /// Validates all sections.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found.
    pub fn validate(&self) -> Result<()> {
        self.generation.validate()
    }
}
