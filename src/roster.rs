//! Group membership
//!
//! Holds the submitted traveler profiles for one group. Any change to the
//! membership makes a previously computed plan stale.

use tracing::{debug, info};

use crate::models::{DestinationCandidate, Pace, PlanRequest, TravelerProfile, TravelerRole};
use crate::planning::TripPlan;
use crate::{PlannerError, Result};

#[derive(Debug, Clone, Default)]
pub struct GroupRoster {
    travelers: Vec<TravelerProfile>,
    revision: u64,
    plan: Option<(u64, TripPlan)>,
}

impl GroupRoster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new traveler; ids are unique and a group has at most one creator
    pub fn submit(&mut self, profile: TravelerProfile) -> Result<()> {
        if self.position(&profile.id).is_some() {
            return Err(PlannerError::validation(format!(
                "Traveler '{}' already submitted",
                profile.id
            )));
        }
        if profile.role == TravelerRole::Creator
            && self.travelers.iter().any(|t| t.role == TravelerRole::Creator)
        {
            return Err(PlannerError::validation("Group already has a creator"));
        }

        info!("Traveler {} joined the group", profile.id);
        self.travelers.push(profile);
        self.bump();
        Ok(())
    }

    /// Replace a traveler's profile in place
    pub fn update(&mut self, profile: TravelerProfile) -> Result<()> {
        let Some(index) = self.position(&profile.id) else {
            return Err(PlannerError::validation(format!(
                "Unknown traveler '{}'",
                profile.id
            )));
        };
        self.travelers[index] = profile;
        self.bump();
        Ok(())
    }

    pub fn remove(&mut self, traveler_id: &str) -> Result<TravelerProfile> {
        let Some(index) = self.position(traveler_id) else {
            return Err(PlannerError::validation(format!(
                "Unknown traveler '{traveler_id}'"
            )));
        };
        let removed = self.travelers.remove(index);
        self.bump();
        Ok(removed)
    }

    /// Profiles in submission order
    #[must_use]
    pub fn travelers(&self) -> &[TravelerProfile] {
        &self.travelers
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn store_plan(&mut self, plan: TripPlan) {
        self.plan = Some((self.revision, plan));
    }

    /// The stored plan, if nothing changed since it was stored
    #[must_use]
    pub fn current_plan(&self) -> Option<&TripPlan> {
        match &self.plan {
            Some((revision, plan)) if *revision == self.revision => Some(plan),
            _ => None,
        }
    }

    /// Planning input for the current membership
    #[must_use]
    pub fn to_request(&self, destinations: Vec<DestinationCandidate>, pace: Pace) -> PlanRequest {
        PlanRequest {
            destinations,
            pace,
            ..PlanRequest::new(self.travelers.clone())
        }
    }

    fn position(&self, traveler_id: &str) -> Option<usize> {
        self.travelers.iter().position(|t| t.id == traveler_id)
    }

    fn bump(&mut self) {
        self.revision += 1;
        if self.plan.take().is_some() {
            debug!("Stored plan invalidated at revision {}", self.revision);
        }
    }
}
