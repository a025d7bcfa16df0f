use crate::events::{SessionDataEvent, SessionErrorEvent, SessionLifecycleEvent};

/// Sink for the events a presentation layer renders. Implementations must
/// not block; the session loop calls these inline.
pub trait CoachRuntime: Send + Sync + 'static {
    fn emit_lifecycle(&self, event: SessionLifecycleEvent);
    fn emit_data(&self, event: SessionDataEvent);
    fn emit_error(&self, event: SessionErrorEvent);
}

/// Logs events and otherwise drops them. Useful for headless runs.
pub struct TracingRuntime;

impl CoachRuntime for TracingRuntime {
    fn emit_lifecycle(&self, event: SessionLifecycleEvent) {
        tracing::info!(?event, "session_lifecycle");
    }

    fn emit_data(&self, event: SessionDataEvent) {
        tracing::debug!(?event, "session_data");
    }

    fn emit_error(&self, event: SessionErrorEvent) {
        tracing::warn!(?event, "session_error");
    }
}
