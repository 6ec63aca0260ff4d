//! Destination scoring against the aggregated group profile

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::models::Destination;
use crate::planning::preferences::GroupProfile;

/// Score breakdown for one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationScore {
    pub name: String,
    pub score: f64,
    pub vibe_score: f64,
    pub interest_score: f64,
    pub budget_bonus: f64,
    /// Estimated per-person cost for the scored trip length
    pub total_cost: f64,
}

/// Weighted tag matching plus a budget fit bonus
#[derive(Debug, Clone)]
pub struct DestinationScorer {
    weights: ScoringConfig,
}

impl Default for DestinationScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl DestinationScorer {
    #[must_use]
    pub fn new(weights: ScoringConfig) -> Self {
        Self { weights }
    }

    /// Score a single destination; deterministic and side-effect free
    #[must_use]
    pub fn score(
        &self,
        destination: &Destination,
        profile: &GroupProfile,
        trip_length: u32,
    ) -> DestinationScore {
        let vibe_hits: u32 = destination
            .vibes
            .iter()
            .map(|v| profile.vibe_weight(v))
            .sum();
        let interest_hits: u32 = destination
            .interests
            .iter()
            .map(|i| profile.interest_weight(i))
            .sum();

        let vibe_score = self.weights.vibe_weight * f64::from(vibe_hits);
        let interest_score = self.weights.interest_weight * f64::from(interest_hits);
        let total_cost = destination.total_cost(trip_length);
        let budget_bonus = self.budget_bonus(total_cost, profile);

        DestinationScore {
            name: destination.name.clone(),
            score: vibe_score + interest_score + budget_bonus,
            vibe_score,
            interest_score,
            budget_bonus,
            total_cost,
        }
    }

    /// Score every destination and sort best first; ties keep input order
    #[tracing::instrument(
        skip(self, destinations, profile),
        fields(destinations = destinations.len())
    )]
    pub fn rank(
        &self,
        destinations: &[Destination],
        profile: &GroupProfile,
        trip_length: u32,
    ) -> Vec<DestinationScore> {
        let mut scores: Vec<DestinationScore> = destinations
            .iter()
            .map(|d| self.score(d, profile, trip_length))
            .collect();

        scores.sort_by(|a, b| b.score.total_cmp(&a.score));

        for s in &scores {
            debug!("{} scored {:.1} (cost {:.2})", s.name, s.score, s.total_cost);
        }
        scores
    }

    fn budget_bonus(&self, total_cost: f64, profile: &GroupProfile) -> f64 {
        let band = profile.budget;
        if total_cost <= band.min {
            self.weights.under_min_bonus
        } else if total_cost <= band.max {
            self.weights.within_band_bonus
        } else {
            self.weights.over_budget_penalty
        }
    }
}
