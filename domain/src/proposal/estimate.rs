//! Travel time and turn cost estimates

use super::entities::{Difficulty, MovementMethod};

/// In-world minutes covered by one action point
pub const MINUTES_PER_ACTION_POINT: u32 = 60;

/// Upper bound on the turns a single move can cost (one in-world day)
pub const MAX_ACTION_POINTS: u32 = 24;

/// Estimated duration and turn cost of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementEstimate {
    pub minutes: u32,
    pub action_points: u32,
}

impl MovementEstimate {
    /// Estimate from the travel method and route difficulty
    pub fn for_route(method: MovementMethod, difficulty: Difficulty) -> Self {
        let minutes = (base_minutes(method) as f64 * difficulty_factor(difficulty)).ceil() as u32;
        Self::from_minutes(method, minutes)
    }

    /// Turn cost for an explicit duration, capped at [`MAX_ACTION_POINTS`]
    pub fn from_minutes(method: MovementMethod, minutes: u32) -> Self {
        let action_points = match method {
            MovementMethod::Teleport => 1,
            _ => minutes
                .div_ceil(MINUTES_PER_ACTION_POINT)
                .clamp(1, MAX_ACTION_POINTS),
        };
        Self {
            minutes,
            action_points,
        }
    }
}

fn base_minutes(method: MovementMethod) -> u32 {
    match method {
        MovementMethod::Walk => 60,
        MovementMethod::Run => 40,
        MovementMethod::Ride => 30,
        MovementMethod::Fly => 20,
        MovementMethod::Vehicle => 25,
        MovementMethod::Teleport => 1,
    }
}

fn difficulty_factor(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.75,
        Difficulty::Normal => 1.0,
        Difficulty::Hard => 1.5,
        Difficulty::Dangerous => 2.0,
    }
}
