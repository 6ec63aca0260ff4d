//! Preference aggregation
//!
//! Folds individual traveler preferences into a single group profile and
//! flags the disagreements the group should talk about.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::warn;

use crate::config::PreferencesConfig;
use crate::models::{AccommodationTier, BudgetRange, TravelerProfile, normalize_tag};

/// How serious a conflict is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Warning,
    Critical,
}

/// What the group disagrees on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    BudgetIncompatible,
    DurationSpread,
    StyleMismatch,
}

/// A non-fatal disagreement surfaced to the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub severity: ConflictSeverity,
    pub kind: ConflictKind,
    pub message: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            ConflictSeverity::Warning => "WARNING",
            ConflictSeverity::Critical => "CRITICAL",
        };
        write!(f, "{label}: {}", self.message)
    }
}

/// Aggregated view of the whole group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupProfile {
    /// Vibe tag to number of travelers who chose it
    pub vibe_weights: BTreeMap<String, u32>,
    /// Interest tag to number of travelers who chose it
    pub interest_weights: BTreeMap<String, u32>,
    /// Intersection of all budget ranges; may be inverted
    pub budget: BudgetRange,
    /// Mean of desired durations, halves rounded to even
    pub consensus_duration: u32,
    pub travelers: Vec<TravelerProfile>,
    pub conflicts: Vec<Conflict>,
}

impl GroupProfile {
    #[must_use]
    pub fn vibe_weight(&self, vibe: &str) -> u32 {
        self.vibe_weights.get(&normalize_tag(vibe)).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn interest_weight(&self, interest: &str) -> u32 {
        self.interest_weights
            .get(&normalize_tag(interest))
            .copied()
            .unwrap_or(0)
    }

    /// Interests by popularity, ties alphabetical
    #[must_use]
    pub fn ranked_interests(&self) -> Vec<&str> {
        let mut ranked: Vec<(&String, &u32)> = self.interest_weights.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        ranked.into_iter().map(|(tag, _)| tag.as_str()).collect()
    }

    #[must_use]
    pub fn has_critical_conflict(&self) -> bool {
        self.conflicts
            .iter()
            .any(|c| c.severity == ConflictSeverity::Critical)
    }

    #[must_use]
    pub fn has_conflict(&self, kind: ConflictKind) -> bool {
        self.conflicts.iter().any(|c| c.kind == kind)
    }
}

/// Builds the group profile from individual submissions
#[derive(Debug, Clone)]
pub struct PreferenceAggregator {
    duration_spread_warning_days: u32,
}

impl Default for PreferenceAggregator {
    fn default() -> Self {
        Self::new(&PreferencesConfig::default())
    }
}

impl PreferenceAggregator {
    #[must_use]
    pub fn new(config: &PreferencesConfig) -> Self {
        Self {
            duration_spread_warning_days: config.duration_spread_warning_days,
        }
    }

    #[tracing::instrument(skip(self, travelers), fields(travelers = travelers.len()))]
    pub fn aggregate(&self, travelers: &[TravelerProfile]) -> GroupProfile {
        if travelers.is_empty() {
            return GroupProfile::default();
        }

        let vibe_weights = tally(travelers.iter().map(|t| t.vibes.iter()));
        let interest_weights = tally(travelers.iter().map(|t| t.interests.iter()));

        let budget = intersect_budgets(travelers);

        let total_days: u64 = travelers.iter().map(|t| u64::from(t.desired_duration)).sum();
        let mean = total_days as f64 / travelers.len() as f64;
        let consensus_duration = mean.round_ties_even() as u32;

        let conflicts = self.detect_conflicts(travelers, budget);
        for conflict in &conflicts {
            warn!("{}", conflict);
        }

        GroupProfile {
            vibe_weights,
            interest_weights,
            budget,
            consensus_duration,
            travelers: travelers.to_vec(),
            conflicts,
        }
    }

    fn detect_conflicts(
        &self,
        travelers: &[TravelerProfile],
        budget: BudgetRange,
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        if budget.is_inverted() {
            conflicts.push(Conflict {
                severity: ConflictSeverity::Critical,
                kind: ConflictKind::BudgetIncompatible,
                message: format!(
                    "Budgets do not overlap: highest minimum {:.2} exceeds lowest maximum {:.2}",
                    budget.min, budget.max
                ),
            });
        }

        let shortest = travelers.iter().map(|t| t.desired_duration).min().unwrap_or(0);
        let longest = travelers.iter().map(|t| t.desired_duration).max().unwrap_or(0);
        if longest - shortest > self.duration_spread_warning_days {
            conflicts.push(Conflict {
                severity: ConflictSeverity::Warning,
                kind: ConflictKind::DurationSpread,
                message: format!(
                    "Desired trip lengths range from {shortest} to {longest} days"
                ),
            });
        }

        let wants = |style: &str, tier: AccommodationTier| {
            travelers.iter().any(|t| {
                t.accommodation == tier || t.vibes.iter().any(|v| normalize_tag(v) == style)
            })
        };
        if wants("luxury", AccommodationTier::Luxury)
            && wants("budget", AccommodationTier::Budget)
        {
            conflicts.push(Conflict {
                severity: ConflictSeverity::Warning,
                kind: ConflictKind::StyleMismatch,
                message: "Group mixes luxury and budget travel styles".to_string(),
            });
        }

        conflicts
    }
}

/// Highest minimum and lowest maximum over the travelers who stated a budget
fn intersect_budgets(travelers: &[TravelerProfile]) -> BudgetRange {
    let stated: Vec<BudgetRange> = travelers.iter().filter_map(|t| t.budget).collect();
    if stated.is_empty() {
        return BudgetRange::default();
    }
    BudgetRange {
        min: stated.iter().map(|b| b.min).fold(f64::NEG_INFINITY, f64::max),
        max: stated.iter().map(|b| b.max).fold(f64::INFINITY, f64::min),
    }
}

fn tally<'a, I, T>(tag_sets: I) -> BTreeMap<String, u32>
where
    I: Iterator<Item = T>,
    T: Iterator<Item = &'a String>,
{
    let mut counts = BTreeMap::new();
    for tags in tag_sets {
        // a traveler counts once per tag even if casing differs
        let normalized: BTreeSet<String> = tags.map(|t| normalize_tag(t)).collect();
        for tag in normalized {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
}
