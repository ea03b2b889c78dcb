//! Request and context types.
//!
//! A [`WorkflowRequest`] is what the user fills in; a [`WorkflowContext`] is
//! its fixed-order text rendering, built once per run and embedded verbatim
//! in every stage prompt.

mod builder;
mod request;

pub use builder::{build, WorkflowContext};
pub use request::WorkflowRequest;
