//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] — newtype identifiers for proposals, votes, sessions, characters
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod ids;
pub mod string;
