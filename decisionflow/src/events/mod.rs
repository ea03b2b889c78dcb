//! Event sinks.
//!
//! The orchestrator publishes every stage status change, fallback
//! substitution, and run completion to exactly one [`EventSink`] supplied at
//! construction. There is no process-wide sink.

mod sink;

pub use sink::{ChannelEventSink, CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
