//! `TripSync` - Group trip optimization engine
//!
//! This library turns a set of traveler submissions into a trip plan:
//! shared date windows, a ranked destination, fair room allocation and a
//! day-by-day activity schedule.

pub mod config;
pub mod error;
pub mod memo;
pub mod models;
pub mod planning;
pub mod roster;

// Re-export core types for public API
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use memo::{InMemoryPlanMemo, PlanKey, PlanMemo};
pub use models::{Destination, DestinationCandidate, PlanRequest, TravelerProfile};
pub use planning::{
    ActivityScheduler, AvailabilityResolver, DestinationScorer, PreferenceAggregator,
    RoomAllocator, TripPlan, TripPlanner,
};
pub use roster::GroupRoster;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
