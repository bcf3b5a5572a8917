//! AI voter decision policies
//!
//! A policy turns a proposal and a character profile into a vote. The
//! default [`UrgencyBiasedPolicy`] is rule-based; richer policies plug in
//! through [`AiVotePolicy`].

use crate::core::error::DomainError;
use crate::party::CharacterProfile;
use crate::proposal::{Difficulty, MovementProposal, Urgency, VoteChoice};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Inputs available to a policy when deciding
#[derive(Debug, Clone, Copy)]
pub struct AiVoteContext<'a> {
    pub proposal: &'a MovementProposal,
    pub character: &'a CharacterProfile,
    pub allow_abstention: bool,
}

/// A decision produced by a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDecision {
    pub choice: VoteChoice,
    pub reason: String,
    /// Confidence level (0.0 to 1.0), telemetry only
    pub confidence: Option<f64>,
}

impl AiDecision {
    pub fn new(choice: VoteChoice, reason: impl Into<String>) -> Self {
        Self {
            choice,
            reason: reason.into(),
            confidence: None,
        }
    }

    /// Add confidence level to the decision
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Fallback recorded when a decision could not be produced
    pub fn abstain_after_error(error: impl std::fmt::Display) -> Self {
        Self::new(
            VoteChoice::Abstain,
            format!("Abstained: could not reach a decision ({error})"),
        )
        .with_confidence(0.0)
    }
}

/// Pluggable decision strategy for AI-controlled party members
pub trait AiVotePolicy: Send + Sync {
    fn decide(
        &self,
        context: &AiVoteContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<AiDecision, DomainError>;
}

/// Rule-based policy
///
/// - a fixed chance to reject (doubled on dangerous routes)
/// - high urgency approves
/// - low urgency abstains with `low_urgency_abstain_probability`, else approves
/// - normal urgency approves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgencyBiasedPolicy {
    pub reject_probability: f64,
    pub low_urgency_abstain_probability: f64,
}

impl Default for UrgencyBiasedPolicy {
    fn default() -> Self {
        Self {
            reject_probability: 0.1,
            low_urgency_abstain_probability: 0.4,
        }
    }
}

/// Clamp into `0.0..=1.0`; NaN counts as never
pub fn clamp_probability(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl UrgencyBiasedPolicy {
    fn reject_chance(&self, difficulty: Difficulty) -> f64 {
        let base = clamp_probability(self.reject_probability);
        match difficulty {
            Difficulty::Dangerous => (base * 2.0).min(1.0),
            _ => base,
        }
    }
}

impl AiVotePolicy for UrgencyBiasedPolicy {
    fn decide(
        &self,
        context: &AiVoteContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<AiDecision, DomainError> {
        let proposal = context.proposal;
        let name = &context.character.name;
        let destination = &proposal.target_location_id;

        if rng.gen_bool(self.reject_chance(proposal.difficulty)) {
            return Ok(AiDecision::new(
                VoteChoice::Reject,
                format!(
                    "{name} has reservations about going to {destination} by {}",
                    proposal.movement_method
                ),
            )
            .with_confidence(0.6));
        }

        let decision = match proposal.urgency {
            Urgency::High => AiDecision::new(
                VoteChoice::Approve,
                format!("{name} agrees this is urgent and is ready to leave for {destination}"),
            )
            .with_confidence(0.9),
            Urgency::Low
                if context.allow_abstention
                    && rng.gen_bool(clamp_probability(self.low_urgency_abstain_probability)) =>
            {
                AiDecision::new(
                    VoteChoice::Abstain,
                    format!("{name} has no strong feelings about visiting {destination}"),
                )
                .with_confidence(0.5)
            }
            Urgency::Low => AiDecision::new(
                VoteChoice::Approve,
                format!("{name} doesn't mind heading to {destination}"),
            )
            .with_confidence(0.6),
            Urgency::Normal => AiDecision::new(
                VoteChoice::Approve,
                format!("{name} supports the plan to travel to {destination}"),
            )
            .with_confidence(0.75),
        };

        Ok(decision)
    }
}
