//! Application-level configuration.
//!
//! - [`AiVoterConfig`] — AI voter thinking time and RNG seeding

pub mod ai_voter;

pub use ai_voter::{AiVoterConfig, DelayRange};
