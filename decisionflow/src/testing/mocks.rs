//! Scripted generation client for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::core::StageKind;
use crate::errors::{StageError, TransportError};
use crate::providers::GenerationClient;
use crate::stages::prompt::stage_of;

/// What the scripted client does for one stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Script {
    /// Return this text as the generated response.
    Text(String),
    /// Fail with this error.
    Fail(StageError),
}

/// A generation client that answers from a per-stage script.
///
/// The stage is recognised from the prompt header. Stages without a script
/// entry use the default, which is a `TransportError(500)` unless changed.
/// Every prompt is recorded.
#[derive(Debug)]
pub struct ScriptedGenerationClient {
    scripts: HashMap<StageKind, Script>,
    default: Script,
    prompts: Mutex<Vec<String>>,
}

impl Default for ScriptedGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGenerationClient {
    /// Creates a client that fails every stage with `TransportError(500)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            default: Script::Fail(TransportError::http(500, "scripted failure").into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Creates a client that fails every stage with `error`.
    #[must_use]
    pub fn failing(error: impl Into<StageError>) -> Self {
        Self {
            default: Script::Fail(error.into()),
            ..Self::new()
        }
    }

    /// Creates a client that answers every stage with `text`.
    #[must_use]
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            default: Script::Text(text.into()),
            ..Self::new()
        }
    }

    /// Answers `stage` with `text`.
    #[must_use]
    pub fn respond(mut self, stage: StageKind, text: impl Into<String>) -> Self {
        self.scripts.insert(stage, Script::Text(text.into()));
        self
    }

    /// Fails `stage` with `error`.
    #[must_use]
    pub fn fail(mut self, stage: StageKind, error: impl Into<StageError>) -> Self {
        self.scripts.insert(stage, Script::Fail(error.into()));
        self
    }

    /// Number of prompts received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Every prompt received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Stages in the order they were prompted.
    #[must_use]
    pub fn stages_called(&self) -> Vec<Option<StageKind>> {
        self.prompts.lock().iter().map(|p| stage_of(p)).collect()
    }

    fn script_for(&self, prompt: &str) -> &Script {
        stage_of(prompt)
            .and_then(|stage| self.scripts.get(&stage))
            .unwrap_or(&self.default)
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, StageError> {
        self.prompts.lock().push(prompt.to_string());
        match self.script_for(prompt) {
            Script::Text(text) => Ok(text.clone()),
            Script::Fail(error) => Err(error.clone()),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}
