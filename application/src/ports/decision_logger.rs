//! Port for structured decision logging.
//!
//! Defines the [`DecisionLogger`] trait for recording engine events
//! (proposal creation, votes, AI decisions, status transitions, movement
//! execution) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! decision trail in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured decision event for logging.
pub struct DecisionEvent {
    /// Event type identifier (e.g., "ai_vote_decision", "status_changed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl DecisionEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging decision events.
///
/// The `log` method is synchronous and non-fallible; logging failures
/// never affect vote correctness.
pub trait DecisionLogger: Send + Sync {
    /// Record a decision event.
    fn log(&self, event: DecisionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoDecisionLogger;

impl DecisionLogger for NoDecisionLogger {
    fn log(&self, _event: DecisionEvent) {}
}
