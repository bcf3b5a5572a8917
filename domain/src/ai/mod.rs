//! Decision making for AI-controlled party members

pub mod policy;

pub use policy::{
    AiDecision, AiVoteContext, AiVotePolicy, UrgencyBiasedPolicy, clamp_probability,
};
