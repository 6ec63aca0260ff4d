//! Traveler profile model as submitted by each group member

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Per-person trip budget, in the group's currency
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// An intersection of ranges can come out inverted
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self { min: 0.0, max: 0.0 }
    }
}

/// Willingness to share a room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharingMode {
    Private,
    Share,
    #[default]
    Any,
}

impl SharingMode {
    /// Share and any both belong to the sharing cohort
    #[must_use]
    pub fn is_sharing(self) -> bool {
        !matches!(self, SharingMode::Private)
    }
}

/// Accommodation class, also keys the static fallback prices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccommodationTier {
    Budget,
    #[default]
    Standard,
    Luxury,
}

impl AccommodationTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AccommodationTier::Budget => "budget",
            AccommodationTier::Standard => "standard",
            AccommodationTier::Luxury => "luxury",
        }
    }
}

impl fmt::Display for AccommodationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the traveler created the group or joined it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelerRole {
    Creator,
    #[default]
    Member,
}

/// Constraints submitted by a single traveler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelerProfile {
    /// Stable identifier within the group
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: TravelerRole,
    /// Dates the traveler is free to travel
    #[serde(default)]
    pub available_dates: BTreeSet<NaiveDate>,
    /// Desired trip length in days
    pub desired_duration: u32,
    /// Absent when the traveler did not state a budget
    #[serde(default)]
    pub budget: Option<BudgetRange>,
    #[serde(default)]
    pub vibes: BTreeSet<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    /// City or airport the traveler departs from
    #[serde(default)]
    pub departure_point: String,
    #[serde(default)]
    pub accommodation: AccommodationTier,
    #[serde(default)]
    pub sharing: SharingMode,
}

impl TravelerProfile {
    /// Create a profile with defaults for every optional field
    #[must_use]
    pub fn new(id: impl Into<String>, desired_duration: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            role: TravelerRole::default(),
            available_dates: BTreeSet::new(),
            desired_duration,
            budget: None,
            vibes: BTreeSet::new(),
            interests: BTreeSet::new(),
            departure_point: String::new(),
            accommodation: AccommodationTier::default(),
            sharing: SharingMode::default(),
        }
    }

    /// Mark every day from `start` to `end` (inclusive) as available
    #[must_use]
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.available_dates.extend(start.iter_days().take_while(|d| *d <= end));
        self
    }

    #[must_use]
    pub fn with_budget(mut self, min: f64, max: f64) -> Self {
        self.budget = Some(BudgetRange::new(min, max));
        self
    }

    #[must_use]
    pub fn with_vibes<I, S>(mut self, vibes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vibes.extend(vibes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests.extend(interests.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_sharing(mut self, sharing: SharingMode) -> Self {
        self.sharing = sharing;
        self
    }

    #[must_use]
    pub fn with_accommodation(mut self, tier: AccommodationTier) -> Self {
        self.accommodation = tier;
        self
    }

    /// True when the traveler is free on every given date
    #[must_use]
    pub fn is_available_for(&self, dates: &[NaiveDate]) -> bool {
        dates.iter().all(|d| self.available_dates.contains(d))
    }
}
