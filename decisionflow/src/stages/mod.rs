//! Stage execution.
//!
//! A stage is one prompt/generate/parse cycle. The [`StageRunner`] absorbs
//! every transport and format failure by substituting the stage's fallback
//! artifact, so running a stage always yields a schema-valid artifact.

pub mod prompt;
mod runner;

pub use prompt::build_prompt;
pub use runner::{StageAttempt, StageRunner};
