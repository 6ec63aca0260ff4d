//! Data models for the `TripSync` engine
//!
//! This module contains the plain value records exchanged with collaborators:
//! - Traveler: per-traveler constraints as submitted
//! - Destination: candidate destinations and their pre-fetched data
//! - Room: room inventory, assignments and per-person costs
//! - Activity: activity pool, pace, weather and the day-indexed plan
//! - Request: the complete planning input

pub mod activity;
pub mod destination;
pub mod request;
pub mod room;
pub mod traveler;

// Re-export all public types for convenient access
pub use activity::{
    Activity, ActivityCategory, ActivityPlan, DailyWeather, DayPlan, Pace, ScheduledActivity,
};
pub use destination::{Destination, DestinationCandidate};
pub use request::PlanRequest;
pub use room::{
    FallbackPriceTable, RoomAllocation, RoomAssignment, RoomCohort, RoomInventory, RoomType,
    TierRates, TravelerCost,
};
pub use traveler::{AccommodationTier, BudgetRange, SharingMode, TravelerProfile, TravelerRole};

/// Lower-case and trim a free-form tag so tallies and matches agree
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}
