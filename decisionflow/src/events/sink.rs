//! Event sink trait and implementations.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn, Level};

use crate::core::{AgentStatus, StageKind, WorkflowEvent};

/// Receives workflow events from the orchestrator.
///
/// Sinks must not fail the run: delivery problems are logged and dropped.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: &WorkflowEvent);

    /// Emits an event without awaiting.
    fn try_emit(&self, event: &WorkflowEvent);
}

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: &WorkflowEvent) {}

    fn try_emit(&self, _event: &WorkflowEvent) {}
}

/// A sink that logs events through `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a logging sink at the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }

    fn log_event(&self, event: &WorkflowEvent) {
        let event_type = event.event_type();
        match event {
            WorkflowEvent::StageStatusChanged { run_id, stage, status } => {
                if self.level == Level::DEBUG {
                    debug!(event_type, run_id = %run_id, stage = %stage, status = %status, "Stage status changed");
                } else {
                    info!(event_type, run_id = %run_id, stage = %stage, status = %status, "Stage status changed");
                }
            }
            WorkflowEvent::FallbackSubstituted { run_id, stage, reason } => {
                warn!(event_type, run_id = %run_id, stage = %stage, reason = %reason, "Fallback artifact substituted");
            }
            WorkflowEvent::RunCompleted { result } => {
                info!(
                    event_type,
                    run_id = %result.run_id,
                    fallback_stages = result.fallback_stages().len(),
                    "Pipeline completed"
                );
            }
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: &WorkflowEvent) {
        self.log_event(event);
    }

    fn try_emit(&self, event: &WorkflowEvent) {
        self.log_event(event);
    }
}

/// A sink that keeps every event in memory, for tests and inspection.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<WorkflowEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns events whose dotted type starts with `type_prefix`.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<WorkflowEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type().starts_with(type_prefix))
            .cloned()
            .collect()
    }

    /// Status transitions in emission order.
    #[must_use]
    pub fn status_changes(&self) -> Vec<(StageKind, AgentStatus)> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                WorkflowEvent::StageStatusChanged { stage, status, .. } => Some((*stage, *status)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: &WorkflowEvent) {
        self.events.write().push(event.clone());
    }

    fn try_emit(&self, event: &WorkflowEvent) {
        self.events.write().push(event.clone());
    }
}

/// A sink that forwards events to an unbounded tokio channel.
///
/// A closed receiver is not an error for the run; the event is dropped.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<WorkflowEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver that observes it.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WorkflowEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: &WorkflowEvent) {
        if self.sender.send(event.clone()).is_err() {
            debug!(event_type = event.event_type(), "Event receiver dropped; discarding event");
        }
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn emit(&self, event: &WorkflowEvent) {
        self.send(event);
    }

    fn try_emit(&self, event: &WorkflowEvent) {
        self.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkflowResult;

    fn processing(stage: StageKind) -> WorkflowEvent {
        WorkflowEvent::status_changed("run-1", stage, AgentStatus::Processing)
    }

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpEventSink;
        sink.emit(&processing(StageKind::Research)).await;
        sink.try_emit(&processing(StageKind::Analysis));
    }

    #[tokio::test]
    async fn test_logging_sink() {
        let sink = LoggingEventSink::default();
        sink.emit(&processing(StageKind::Research)).await;
        sink.try_emit(&WorkflowEvent::fallback("run-1", StageKind::Research, "boom"));
        LoggingEventSink::debug()
            .emit(&WorkflowEvent::completed(WorkflowResult::new("run-1")))
            .await;
    }

    #[tokio::test]
    async fn test_collecting_sink() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(&processing(StageKind::Research)).await;
        sink.try_emit(&WorkflowEvent::status_changed(
            "run-1",
            StageKind::Research,
            AgentStatus::Completed,
        ));

        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.status_changes(),
            vec![
                (StageKind::Research, AgentStatus::Processing),
                (StageKind::Research, AgentStatus::Completed),
            ]
        );
    }

    #[tokio::test]
    async fn test_collecting_sink_filter() {
        let sink = CollectingEventSink::new();
        sink.emit(&processing(StageKind::Research)).await;
        sink.emit(&WorkflowEvent::fallback("run-1", StageKind::Research, "x")).await;
        sink.emit(&WorkflowEvent::completed(WorkflowResult::new("run-1"))).await;

        assert_eq!(sink.events_of_type("stage.").len(), 2);
        assert_eq!(sink.events_of_type("pipeline.").len(), 1);
    }

    #[tokio::test]
    async fn test_collecting_sink_clear() {
        let sink = CollectingEventSink::new();
        sink.emit(&processing(StageKind::Strategy)).await;
        assert_eq!(sink.len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelEventSink::new();
        sink.emit(&processing(StageKind::Research)).await;
        sink.try_emit(&processing(StageKind::Analysis));

        assert_eq!(rx.recv().await.unwrap().stage(), Some(StageKind::Research));
        assert_eq!(rx.recv().await.unwrap().stage(), Some(StageKind::Analysis));
    }

    #[tokio::test]
    async fn test_channel_sink_tolerates_dropped_receiver() {
        let (sink, rx) = ChannelEventSink::new();
        drop(rx);
        sink.emit(&processing(StageKind::Research)).await;
    }
}
