//! Testing utilities for decisionflow pipelines.
//!
//! This module provides:
//! - A scripted generation client that answers per stage
//! - Canned requests and responses
//! - Assertions for artifacts and status sequences

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_fallback, assert_live, assert_schema_valid, assert_status_sequence,
    expected_status_sequence,
};
pub use fixtures::{
    analysis_response, fenced_research_response, sample_request, strategy_response,
    test_orchestrator, validation_response,
};
pub use mocks::{Script, ScriptedGenerationClient};
