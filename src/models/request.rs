//! Complete planning input as assembled by the surrounding service

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use super::{DestinationCandidate, Pace, TravelerProfile};
use crate::{PlannerError, Result};

/// Everything the engine needs for one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub travelers: Vec<TravelerProfile>,
    #[serde(default)]
    pub destinations: Vec<DestinationCandidate>,
    #[serde(default)]
    pub pace: Pace,
    /// Destination the group already settled on, if any
    #[serde(default)]
    pub preferred_destination: Option<String>,
}

impl PlanRequest {
    #[must_use]
    pub fn new(travelers: Vec<TravelerProfile>) -> Self {
        Self {
            travelers,
            destinations: Vec::new(),
            pace: Pace::default(),
            preferred_destination: None,
        }
    }

    /// Parse a request from JSON; malformed dates are rejected here
    pub fn from_json(json: &str) -> Result<Self> {
        let request: PlanRequest = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Read and parse a request file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Boundary checks the core relies on
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for traveler in &self.travelers {
            if traveler.id.trim().is_empty() {
                return Err(PlannerError::validation("Traveler id cannot be empty"));
            }
            if !seen.insert(traveler.id.as_str()) {
                return Err(PlannerError::validation(format!(
                    "Duplicate traveler id '{}'",
                    traveler.id
                )));
            }
            if traveler
                .budget
                .is_some_and(|b| b.min < 0.0 || b.max < 0.0)
            {
                return Err(PlannerError::validation(format!(
                    "Traveler '{}' has a negative budget",
                    traveler.id
                )));
            }
        }

        for candidate in &self.destinations {
            let name = &candidate.destination.name;
            if candidate.destination.cost_per_day < 0.0 {
                return Err(PlannerError::validation(format!(
                    "Destination '{name}' has a negative daily cost"
                )));
            }
            for (room_name, room) in candidate.rooms.iter() {
                if room.capacity == 0 {
                    return Err(PlannerError::validation(format!(
                        "Room '{room_name}' at '{name}' must sleep at least one guest"
                    )));
                }
                if room.nightly_price < 0.0 {
                    return Err(PlannerError::validation(format!(
                        "Room '{room_name}' at '{name}' has a negative nightly price"
                    )));
                }
            }
            if let Some(activity) = candidate
                .activities
                .iter()
                .find(|a| a.cost_per_person < 0.0)
            {
                return Err(PlannerError::validation(format!(
                    "Activity '{}' at '{name}' has a negative cost",
                    activity.name
                )));
            }
        }

        Ok(())
    }
}
