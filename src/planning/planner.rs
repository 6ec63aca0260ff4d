//! Trip planning pipeline
//!
//! Runs the five planning components in dependency order and bundles their
//! outputs into a single [`TripPlan`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::memo::{PlanKey, PlanMemo};
use crate::models::{ActivityPlan, DestinationCandidate, PlanRequest, RoomAllocation};
use crate::planning::activities::{ActivityRequest, ActivityScheduler};
use crate::planning::availability::{AvailabilityReport, AvailabilityResolver, DateWindow};
use crate::planning::destination_scorer::{DestinationScore, DestinationScorer};
use crate::planning::preferences::{Conflict, GroupProfile, PreferenceAggregator};
use crate::planning::rooms::RoomAllocator;
use crate::{PlannerError, Result};

/// Complete plan for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub availability: AvailabilityReport,
    pub group: GroupProfile,
    /// Window the plan is built on
    pub window: DateWindow,
    pub destination_ranking: Vec<DestinationScore>,
    pub destination: String,
    pub rooms: RoomAllocation,
    pub activities: ActivityPlan,
}

impl TripPlan {
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.group.conflicts
    }

    /// Accommodation plus activities for one traveler
    #[must_use]
    pub fn per_person_cost(&self, traveler_id: &str) -> Option<f64> {
        self.rooms
            .cost_for(traveler_id)
            .map(|c| c.total_cost + self.activities.total_cost)
    }
}

/// Orchestrates the planning components
#[derive(Debug, Clone)]
pub struct TripPlanner {
    resolver: AvailabilityResolver,
    aggregator: PreferenceAggregator,
    scorer: DestinationScorer,
    allocator: RoomAllocator,
    scheduler: ActivityScheduler,
}

impl Default for TripPlanner {
    fn default() -> Self {
        Self::new(&PlannerConfig::default())
    }
}

impl TripPlanner {
    #[must_use]
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            resolver: AvailabilityResolver::new(&config.availability),
            aggregator: PreferenceAggregator::new(&config.preferences),
            scorer: DestinationScorer::new(config.scoring.clone()),
            allocator: RoomAllocator::new(config.rooms.fallback.clone()),
            scheduler: ActivityScheduler::new(&config.activities),
        }
    }

    /// Best and near-miss windows only
    #[must_use]
    pub fn resolve_dates(&self, request: &PlanRequest) -> AvailabilityReport {
        self.resolver.resolve(&request.travelers)
    }

    /// Group profile only
    #[must_use]
    pub fn profile(&self, request: &PlanRequest) -> GroupProfile {
        self.aggregator.aggregate(&request.travelers)
    }

    /// Rank the request's destinations for a given trip length
    #[must_use]
    pub fn rank_destinations(
        &self,
        request: &PlanRequest,
        profile: &GroupProfile,
        trip_length: u32,
    ) -> Vec<DestinationScore> {
        let destinations: Vec<_> = request
            .destinations
            .iter()
            .map(|c| c.destination.clone())
            .collect();
        self.scorer.rank(&destinations, profile, trip_length)
    }

    /// Build a full plan; an empty availability result is a hard failure
    #[tracing::instrument(
        skip(self, request),
        fields(travelers = request.travelers.len(), destinations = request.destinations.len())
    )]
    pub fn plan(&self, request: &PlanRequest) -> Result<TripPlan> {
        request.validate()?;
        let availability = self.resolve_dates(request);
        let Some(window) = availability.best().cloned() else {
            return Err(PlannerError::no_common_window(format!(
                "no contiguous window covers any of the {} travelers",
                request.travelers.len()
            )));
        };
        info!(
            "Planning around {} to {} ({} days)",
            window.start, window.end, window.duration
        );

        let group = self.profile(request);
        if group.has_critical_conflict() {
            warn!("Planning continues despite critical conflicts");
        }

        let destination_ranking = self.rank_destinations(request, &group, window.duration);
        let candidate = choose_destination(request, &destination_ranking)?;
        info!("Selected destination {}", candidate.destination.name);

        let nights = window.duration.saturating_sub(1);
        let rooms = self
            .allocator
            .allocate(&request.travelers, &candidate.rooms, nights);

        let per_person_budget = if group.budget.is_inverted() {
            group.budget.min
        } else {
            group.budget.max
        };
        let activity_request = ActivityRequest::new(&candidate.activities, window.duration)
            .with_profile(&group)
            .with_pace(request.pace)
            .with_budget(per_person_budget.max(0.0))
            .starting(window.start)
            .with_weather(&candidate.weather);
        let activities = self.scheduler.schedule(&activity_request);

        Ok(TripPlan {
            destination: candidate.destination.name.clone(),
            availability,
            group,
            window,
            destination_ranking,
            rooms,
            activities,
        })
    }

    /// Same as [`TripPlanner::plan`], consulting a caller-supplied memo first
    pub fn plan_with_memo<M: PlanMemo>(
        &self,
        request: &PlanRequest,
        memo: &mut M,
    ) -> Result<TripPlan> {
        let key = PlanKey::for_request(request)?;
        if let Some(plan) = memo.get(key)? {
            debug!("Plan memo hit for {}", key);
            return Ok(plan);
        }

        let plan = self.plan(request)?;
        memo.put(key, &plan)?;
        Ok(plan)
    }
}

/// Preferred destination if the group named a known one, else the top score
fn choose_destination<'a>(
    request: &'a PlanRequest,
    ranking: &[DestinationScore],
) -> Result<&'a DestinationCandidate> {
    let find = |name: &str| {
        request
            .destinations
            .iter()
            .find(|c| c.destination.name == name)
    };

    if let Some(preferred) = &request.preferred_destination {
        match find(preferred) {
            Some(candidate) => return Ok(candidate),
            None => warn!("Preferred destination {} is not a candidate", preferred),
        }
    }

    ranking
        .first()
        .and_then(|top| find(&top.name))
        .ok_or_else(|| PlannerError::no_destinations("no candidate destinations supplied"))
}
