use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStepType {
    Classify,
    Combine,
    SemesterChange,
    Emit,
    Unparsed,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub step_type: TraceStepType,
    pub line_number: usize,
    pub message: String,
}

/// Receives step-by-step events from the extraction pipeline.
///
/// Events are only built when [`TraceSink::enabled`] returns true, so a
/// disabled sink costs nothing beyond the check.
pub trait TraceSink {
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, event: TraceEvent);
}

/// Sink that drops everything. Used by the untraced entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _event: TraceEvent) {}
}

/// Collects every event in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    pub events: Vec<TraceEvent>,
}

impl Default for TraceBundle {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            events: Vec::new(),
        }
    }
}

impl TraceBundle {
    pub fn of_type(&self, step_type: TraceStepType) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.step_type == step_type)
    }
}

impl TraceSink for TraceBundle {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Record an event, building the message only if the sink wants it.
pub(crate) fn emit(
    sink: &mut dyn TraceSink,
    step_type: TraceStepType,
    line_number: usize,
    message: impl FnOnce() -> String,
) {
    if sink.enabled() {
        sink.record(TraceEvent {
            step_type,
            line_number,
            message: message(),
        });
    }
}
