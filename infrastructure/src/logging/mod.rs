//! Logging infrastructure: the structured decision trail.
//!
//! Provides [`JsonlDecisionLogger`], a JSONL file writer that implements
//! the [`DecisionLogger`](consensus_application::DecisionLogger) port.

mod jsonl_decision_logger;

pub use jsonl_decision_logger::JsonlDecisionLogger;
