//! Party consensus domain
//!
//! Pure decision logic: the tally of a proposal and the policy that turns
//! a tally into a status.
//!
//! ```text
//! votes + roster + settings
//!          │
//!          ▼
//!    summarize()  ──▶  VotingSummary   (recomputed every time)
//!          │
//!          ▼
//! ConsensusOutcome::evaluate()  ──▶  voting | approved | rejected
//! ```

pub mod consensus;
pub mod rule;
pub mod summary;

// Re-export main types
pub use consensus::{ConsensusOutcome, RejectionReason};
pub use rule::VotingSystem;
pub use summary::{ConsensusType, VoteCounts, VoterDetail, VotingSummary, summarize};
