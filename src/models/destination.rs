//! Candidate destination records supplied by the destination-data collaborator

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Activity, DailyWeather, RoomInventory};

/// A destination the group could travel to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    #[serde(default)]
    pub vibes: BTreeSet<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    /// Estimated per-person spend per day
    pub cost_per_day: f64,
}

impl Destination {
    #[must_use]
    pub fn new(name: impl Into<String>, cost_per_day: f64) -> Self {
        Self {
            name: name.into(),
            vibes: BTreeSet::new(),
            interests: BTreeSet::new(),
            cost_per_day,
        }
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

    /// Estimated per-person cost of a trip lasting `days`
    #[must_use]
    pub fn total_cost(&self, days: u32) -> f64 {
        self.cost_per_day * f64::from(days)
    }
}

/// A destination together with the data pre-fetched for it by collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationCandidate {
    pub destination: Destination,
    /// Hotel inventory; empty means a tier-based estimate is used
    #[serde(default)]
    pub rooms: RoomInventory,
    /// Ranked activity pool, best first
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Optional per-day forecast, index 0 is the first trip day
    #[serde(default)]
    pub weather: Vec<DailyWeather>,
}

impl DestinationCandidate {
    #[must_use]
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            rooms: RoomInventory::default(),
            activities: Vec::new(),
            weather: Vec::new(),
        }
    }
}
