//! Campaign clock that steps through the periods of a day

use async_trait::async_trait;
use consensus_application::{CollaboratorError, TimeService};
use consensus_domain::{CampaignId, TimeAdvance};
use std::collections::HashMap;
use std::sync::Mutex;

const PERIODS: [&str; 4] = ["morning", "afternoon", "evening", "night"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockState {
    day: u32,
    period: usize,
}

impl Default for ClockState {
    fn default() -> Self {
        Self { day: 1, period: 0 }
    }
}

/// Each campaign starts on the morning of day 1
#[derive(Default)]
pub struct DayPeriodClock {
    campaigns: Mutex<HashMap<CampaignId, ClockState>>,
}

impl DayPeriodClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(day, period)` of a campaign
    pub fn now(&self, campaign_id: &CampaignId) -> (u32, &'static str) {
        let state = self
            .campaigns
            .lock()
            .ok()
            .and_then(|c| c.get(campaign_id).copied())
            .unwrap_or_default();
        (state.day, PERIODS[state.period])
    }
}

#[async_trait]
impl TimeService for DayPeriodClock {
    async fn advance_time(&self, campaign_id: &CampaignId) -> Result<TimeAdvance, CollaboratorError> {
        let mut campaigns = self
            .campaigns
            .lock()
            .map_err(|_| CollaboratorError::Unavailable("clock state poisoned".to_string()))?;
        let state = campaigns.entry(campaign_id.clone()).or_default();

        state.period += 1;
        if state.period == PERIODS.len() {
            state.period = 0;
            state.day += 1;
        }

        let period = PERIODS[state.period];
        Ok(TimeAdvance {
            new_period: period.to_string(),
            new_day: Some(state.day),
            message: format!("Day {}, {}", state.day, period),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rolls_over_to_next_day() {
        let clock = DayPeriodClock::new();
        let campaign: CampaignId = "c-1".into();
        assert_eq!(clock.now(&campaign), (1, "morning"));

        let mut last = None;
        for _ in 0..4 {
            last = Some(clock.advance_time(&campaign).await.unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.new_period, "morning");
        assert_eq!(last.new_day, Some(2));
        assert_eq!(last.message, "Day 2, morning");
        assert_eq!(clock.now(&"other".into()), (1, "morning"));
    }
}
