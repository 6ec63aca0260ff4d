//! Planning components
//!
//! - Availability: shared date windows
//! - Preferences: group profile and conflicts
//! - Destination scorer: weighted ranking of candidates
//! - Rooms: fair room allocation and per-person cost
//! - Activities: day-by-day activity plan
//! - Planner: runs all of the above for one request

pub mod activities;
pub mod availability;
pub mod destination_scorer;
pub mod planner;
pub mod preferences;
pub mod rooms;

pub use activities::{ActivityRequest, ActivityScheduler};
pub use availability::{AvailabilityReport, AvailabilityResolver, DateWindow};
pub use destination_scorer::{DestinationScore, DestinationScorer};
pub use planner::{TripPlan, TripPlanner};
pub use preferences::{Conflict, ConflictKind, ConflictSeverity, GroupProfile, PreferenceAggregator};
pub use rooms::{GreedyPacker, PackedRoom, RoomAllocator, RoomPacker};
