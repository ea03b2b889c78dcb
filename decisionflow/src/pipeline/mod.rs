//! Pipeline orchestration.
//!
//! The [`Orchestrator`] runs the four stages strictly in order, threading
//! each stage's artifact into the prompts of the stages after it, and
//! publishes status transitions to its event sink.

mod integration_tests;
mod orchestrator;

pub use orchestrator::{Orchestrator, FINAL_STEP};
