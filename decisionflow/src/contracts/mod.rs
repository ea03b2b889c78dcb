//! Stage contracts.
//!
//! This module provides:
//! - Per-stage field schemas and value-level validation
//! - The response parser that turns generated text into artifacts
//! - The fallback catalog used when live generation fails

mod fallback;
mod parser;
mod schema;

pub use fallback::fallback_for;
pub use parser::{normalize, parse};
pub use schema::{schema_for, validate_value, FieldSpec, FieldType};
