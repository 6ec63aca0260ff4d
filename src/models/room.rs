//! Room inventory, assignments and the fair per-person cost records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::AccommodationTier;

/// A bookable room type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    /// Number of guests the room sleeps (at least 1)
    pub capacity: u32,
    pub nightly_price: f64,
}

impl RoomType {
    #[must_use]
    pub fn new(capacity: u32, nightly_price: f64) -> Self {
        Self {
            capacity: capacity.max(1),
            nightly_price,
        }
    }
}

/// Room-type name to room type, as returned by a hotel search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomInventory(pub BTreeMap<String, RoomType>);

impl RoomInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_room(mut self, name: impl Into<String>, capacity: u32, nightly_price: f64) -> Self {
        self.0.insert(name.into(), RoomType::new(capacity, nightly_price));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoomType)> {
        self.0.iter().map(|(name, room)| (name.as_str(), room))
    }

    /// Cheapest single-capacity room type, if the hotel has one
    #[must_use]
    pub fn single_room(&self) -> Option<(&str, &RoomType)> {
        self.iter()
            .filter(|(_, room)| room.capacity == 1)
            .min_by(|a, b| a.1.nightly_price.total_cmp(&b.1.nightly_price))
    }
}

/// Nightly room prices for one accommodation tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRates {
    pub single: f64,
    pub double: f64,
}

/// Static prices used when no room inventory is available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPriceTable {
    pub budget: TierRates,
    pub standard: TierRates,
    pub luxury: TierRates,
}

impl Default for FallbackPriceTable {
    fn default() -> Self {
        Self {
            budget: TierRates {
                single: 60.0,
                double: 90.0,
            },
            standard: TierRates {
                single: 120.0,
                double: 170.0,
            },
            luxury: TierRates {
                single: 250.0,
                double: 350.0,
            },
        }
    }
}

impl FallbackPriceTable {
    #[must_use]
    pub fn rates_for(&self, tier: AccommodationTier) -> TierRates {
        match tier {
            AccommodationTier::Budget => self.budget,
            AccommodationTier::Standard => self.standard,
            AccommodationTier::Luxury => self.luxury,
        }
    }

    /// Synthetic single/double inventory for a tier
    #[must_use]
    pub fn inventory_for(&self, tier: AccommodationTier) -> RoomInventory {
        let rates = self.rates_for(tier);
        RoomInventory::new()
            .with_room("single", 1, rates.single)
            .with_room("double", 2, rates.double)
    }
}

/// Which part of the group a room belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomCohort {
    Private,
    Shared,
}

/// One booked room and who sleeps in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAssignment {
    pub room_type: String,
    pub capacity: u32,
    /// Traveler ids
    pub occupants: Vec<String>,
    /// What the hotel bills per night for this room
    pub nominal_price: f64,
    /// What each occupant pays per night after fairness correction
    pub per_occupant_cost: f64,
    pub cohort: RoomCohort,
}

/// Accommodation cost for one traveler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelerCost {
    pub traveler_id: String,
    pub cost_per_night: f64,
    pub total_cost: f64,
}

/// Outcome of allocating a group to rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAllocation {
    pub assignments: Vec<RoomAssignment>,
    pub traveler_costs: Vec<TravelerCost>,
    pub nights: u32,
    /// Equalized nightly rate of the sharing cohort, if it is not empty
    pub shared_rate: Option<f64>,
    /// Prices came from the static tier table rather than a hotel
    pub estimated: bool,
    /// Human-readable room configuration, e.g. "1x double, 1x single"
    pub summary: String,
}

impl RoomAllocation {
    /// Sum of nominal room prices per night (hotel billing)
    #[must_use]
    pub fn total_nightly_cost(&self) -> f64 {
        self.assignments.iter().map(|a| a.nominal_price).sum()
    }

    /// Whole-trip accommodation cost for the group
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.traveler_costs.iter().map(|c| c.total_cost).sum()
    }

    #[must_use]
    pub fn cost_for(&self, traveler_id: &str) -> Option<&TravelerCost> {
        self.traveler_costs
            .iter()
            .find(|c| c.traveler_id == traveler_id)
    }
}
