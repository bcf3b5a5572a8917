//! Domain error types

use crate::proposal::ProposalStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ProposalStatus,
        to: ProposalStatus,
    },

    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Character data unavailable: {0}")]
    CharacterUnavailable(String),
}

impl DomainError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        DomainError::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}
