//! Availability resolution
//!
//! Finds the date windows the most travelers can make, across every trip length
//! between the shortest and the longest desired duration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::config::AvailabilityConfig;
use crate::models::TravelerProfile;

/// A contiguous run of calendar days and who can make all of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Length in days, `end - start + 1`
    pub duration: u32,
    /// Ids of travelers free on every date of the window
    pub covering_travelers: Vec<String>,
    pub missing_travelers: Vec<String>,
    /// Covering travelers over all travelers (0.0-1.0)
    pub coverage: f64,
}

impl DateWindow {
    #[must_use]
    pub fn coverage_percent(&self) -> f64 {
        self.coverage * 100.0
    }

    #[must_use]
    pub fn covering_count(&self) -> usize {
        self.covering_travelers.len()
    }

    /// Every date of the window, in order
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }

    fn ranking(&self, other: &Self) -> Ordering {
        other
            .covering_count()
            .cmp(&self.covering_count())
            .then(other.duration.cmp(&self.duration))
            .then(self.start.cmp(&other.start))
    }
}

/// Best and fallback windows for a group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub best_windows: Vec<DateWindow>,
    /// Windows most of the group can make, offered as alternatives
    pub near_miss_windows: Vec<DateWindow>,
    pub traveler_count: usize,
}

impl AvailabilityReport {
    /// False means the trip is infeasible as submitted
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        !self.best_windows.is_empty()
    }

    #[must_use]
    pub fn best(&self) -> Option<&DateWindow> {
        self.best_windows.first()
    }
}

/// Resolves shared travel windows from per-traveler availability
#[derive(Debug, Clone)]
pub struct AvailabilityResolver {
    coverage_threshold: f64,
    near_miss_coverage: f64,
    near_miss_limit: usize,
}

impl Default for AvailabilityResolver {
    fn default() -> Self {
        Self::new(&AvailabilityConfig::default())
    }
}

impl AvailabilityResolver {
    #[must_use]
    pub fn new(config: &AvailabilityConfig) -> Self {
        Self {
            coverage_threshold: config.coverage_threshold,
            near_miss_coverage: config.near_miss_coverage,
            near_miss_limit: config.near_miss_limit,
        }
    }

    /// Evaluate every contiguous window, then keep those within the coverage
    /// threshold of the final maximum.
    #[tracing::instrument(skip(self, travelers), fields(travelers = travelers.len()))]
    pub fn resolve(&self, travelers: &[TravelerProfile]) -> AvailabilityReport {
        if travelers.is_empty() {
            return AvailabilityReport::default();
        }

        let (min_size, max_size) = window_sizes(travelers);
        let candidate_dates: Vec<NaiveDate> = travelers
            .iter()
            .flat_map(|t| t.available_dates.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        debug!(
            "Scanning {} candidate dates for windows of {}-{} days",
            candidate_dates.len(),
            min_size,
            max_size
        );

        let mut candidates = Vec::new();
        for size in min_size..=max_size {
            let span = size as usize;
            if span > candidate_dates.len() {
                break;
            }
            for slice in candidate_dates.windows(span) {
                if !is_contiguous(slice) {
                    continue;
                }
                if let Some(window) = evaluate_window(slice, travelers) {
                    candidates.push(window);
                }
            }
        }

        let Some(max_covering) = candidates.iter().map(DateWindow::covering_count).max() else {
            warn!("No contiguous window is covered by any traveler");
            return AvailabilityReport {
                traveler_count: travelers.len(),
                ..AvailabilityReport::default()
            };
        };

        let cutoff = self.coverage_threshold * max_covering as f64;
        let (mut best_windows, rest): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|w| w.covering_count() as f64 + f64::EPSILON >= cutoff);
        best_windows.sort_by(DateWindow::ranking);

        let mut near_miss_windows: Vec<DateWindow> = rest
            .into_iter()
            .filter(|w| w.coverage + f64::EPSILON >= self.near_miss_coverage)
            .collect();
        near_miss_windows.sort_by(DateWindow::ranking);
        near_miss_windows.truncate(self.near_miss_limit);

        if let Some(best) = best_windows.first() {
            info!(
                "Best window {} to {} covers {}/{} travelers",
                best.start,
                best.end,
                best.covering_count(),
                travelers.len()
            );
        }

        AvailabilityReport {
            best_windows,
            near_miss_windows,
            traveler_count: travelers.len(),
        }
    }
}

/// Window sizes span the shortest to the longest desired duration, at least one day
fn window_sizes(travelers: &[TravelerProfile]) -> (u32, u32) {
    let min = travelers
        .iter()
        .map(|t| t.desired_duration.max(1))
        .min()
        .unwrap_or(1);
    let max = travelers
        .iter()
        .map(|t| t.desired_duration.max(1))
        .max()
        .unwrap_or(1);
    (min, max)
}

/// Sorted distinct dates are contiguous when first and last are `len - 1` days apart
fn is_contiguous(dates: &[NaiveDate]) -> bool {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => (*last - *first).num_days() == dates.len() as i64 - 1,
        _ => false,
    }
}

fn evaluate_window(dates: &[NaiveDate], travelers: &[TravelerProfile]) -> Option<DateWindow> {
    let (covering, missing): (Vec<&TravelerProfile>, Vec<&TravelerProfile>) =
        travelers.iter().partition(|t| t.is_available_for(dates));

    if covering.is_empty() {
        return None;
    }

    let start = *dates.first()?;
    let end = *dates.last()?;

    Some(DateWindow {
        start,
        end,
        duration: u32::try_from(dates.len()).unwrap_or(u32::MAX),
        coverage: covering.len() as f64 / travelers.len() as f64,
        covering_travelers: covering.into_iter().map(|t| t.id.clone()).collect(),
        missing_travelers: missing.into_iter().map(|t| t.id.clone()).collect(),
    })
}
