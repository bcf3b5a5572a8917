//! Strongly-typed identifiers
//!
//! Every identifier crossing the engine boundary is a newtype over `String`
//! so a voter id can never be passed where a proposal id is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a movement proposal
    ProposalId
);
string_id!(
    /// Identifier of a single vote row
    VoteId
);
string_id!(
    /// Identifier of a play session (one active proposal per session)
    SessionId
);
string_id!(
    /// Identifier of a party member / character
    CharacterId
);
string_id!(
    /// Identifier of a location in the external location graph
    LocationId
);
string_id!(
    /// Identifier of the campaign whose clock advances on movement
    CampaignId
);

impl ProposalId {
    /// Generate a fresh random proposal id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl VoteId {
    /// Generate a fresh random vote id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
