//! # Decisionflow
//!
//! A four-stage business decision pipeline.
//!
//! A [`WorkflowRequest`](context::WorkflowRequest) is rendered into a context
//! once, then Research, Analysis, Strategy and Validation run strictly in
//! order. Each stage prompts a text-generation endpoint, parses the reply
//! against its schema, and falls back to a fixed artifact on any transport or
//! format failure, so every run completes with four schema-valid artifacts.
//!
//! - **Orchestration**: [`pipeline::Orchestrator`] owns per-stage status and
//!   the accumulating result
//! - **Resilience**: [`stages::StageRunner`] absorbs failures and records
//!   provenance
//! - **Observability**: status transitions flow to an [`events::EventSink`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use decisionflow::prelude::*;
//! use std::sync::Arc;
//!
//! let client = build_client(&GenerationConfig::default())?;
//! let mut orchestrator = Orchestrator::new(client, OrchestratorConfig::default())
//!     .with_event_sink(Arc::new(LoggingEventSink::default()));
//!
//! let request = WorkflowRequest::new("Launch support bot", "SaaS");
//! let result = orchestrator.run_pipeline(&request).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod contracts;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod stages;
pub mod testing;
pub mod utils;

pub use errors::{DecisionflowError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AppConfig, GenerationConfig, GenerationMode, OrchestratorConfig};
    pub use crate::context::{build, WorkflowContext, WorkflowRequest};
    pub use crate::contracts::{fallback_for, parse};
    pub use crate::core::{
        AgentStatus, Provenance, StageArtifact, StageKind, WorkflowEvent, WorkflowResult,
    };
    pub use crate::errors::{DecisionflowError, FormatError, StageError, TransportError};
    pub use crate::events::{
        ChannelEventSink, CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink,
    };
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::pipeline::Orchestrator;
    #[cfg(feature = "http")]
    pub use crate::providers::build_client;
    pub use crate::providers::{GenerationClient, HealthReport};
    pub use crate::stages::{StageAttempt, StageRunner};
}
