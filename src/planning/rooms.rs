//! Room allocation with equalized per-person cost
//!
//! Packing travelers into rooms is delegated to a [`RoomPacker`]; whatever
//! strategy is used, every traveler in the sharing cohort ends up paying the
//! same nightly rate: the pooled price of the cohort's rooms divided by its size.
//! Private travelers pay for their own single room.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::models::{
    AccommodationTier, FallbackPriceTable, RoomAllocation, RoomAssignment, RoomCohort,
    RoomInventory, RoomType, TravelerCost, TravelerProfile,
};

/// A room chosen by a packer, before costs are split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedRoom {
    pub room_type: String,
    pub capacity: u32,
    pub nightly_price: f64,
    pub occupants: Vec<String>,
    /// Price taken from the static tier table
    pub estimated: bool,
}

/// Strategy that decides which rooms the sharing cohort occupies
pub trait RoomPacker {
    /// Place every traveler in exactly one room
    fn pack(&self, travelers: &[&TravelerProfile], room_types: &RoomInventory) -> Vec<PackedRoom>;
}

/// Fills the largest room the remaining head count can fill completely,
/// otherwise puts one traveler in a single room.
#[derive(Debug, Clone, Default)]
pub struct GreedyPacker {
    fallback: FallbackPriceTable,
}

impl GreedyPacker {
    #[must_use]
    pub fn new(fallback: FallbackPriceTable) -> Self {
        Self { fallback }
    }
}

impl RoomPacker for GreedyPacker {
    fn pack(&self, travelers: &[&TravelerProfile], room_types: &RoomInventory) -> Vec<PackedRoom> {
        // a zero-capacity room would never place anyone
        let mut by_capacity: Vec<(&str, &RoomType)> =
            room_types.iter().filter(|(_, room)| room.capacity > 0).collect();
        by_capacity.sort_by(|a, b| {
            b.1.capacity
                .cmp(&a.1.capacity)
                .then(a.1.nightly_price.total_cmp(&b.1.nightly_price))
                .then(a.0.cmp(b.0))
        });

        let mut rooms = Vec::new();
        let mut next = 0;
        while next < travelers.len() {
            let remaining = travelers.len() - next;
            let fit = by_capacity
                .iter()
                .find(|(_, room)| room.capacity as usize <= remaining);

            match fit {
                Some((name, room)) => {
                    let take = room.capacity as usize;
                    rooms.push(PackedRoom {
                        room_type: (*name).to_string(),
                        capacity: room.capacity,
                        nightly_price: room.nightly_price,
                        occupants: travelers[next..next + take]
                            .iter()
                            .map(|t| t.id.clone())
                            .collect(),
                        estimated: false,
                    });
                    next += take;
                }
                None => {
                    let traveler = travelers[next];
                    rooms.push(single_room(traveler, room_types, &self.fallback));
                    next += 1;
                }
            }
        }
        rooms
    }
}

/// One traveler alone; hotel single rate or the tier table
fn single_room(
    traveler: &TravelerProfile,
    room_types: &RoomInventory,
    fallback: &FallbackPriceTable,
) -> PackedRoom {
    let (room_type, nightly_price, estimated) = match room_types.single_room() {
        Some((name, room)) => (name.to_string(), room.nightly_price, false),
        None => (
            "single".to_string(),
            fallback.rates_for(traveler.accommodation).single,
            true,
        ),
    };
    PackedRoom {
        room_type,
        capacity: 1,
        nightly_price,
        occupants: vec![traveler.id.clone()],
        estimated,
    }
}

/// Assigns rooms and splits their cost fairly
#[derive(Debug, Clone)]
pub struct RoomAllocator<P: RoomPacker = GreedyPacker> {
    packer: P,
    fallback: FallbackPriceTable,
}

impl RoomAllocator<GreedyPacker> {
    #[must_use]
    pub fn new(fallback: FallbackPriceTable) -> Self {
        Self {
            packer: GreedyPacker::new(fallback.clone()),
            fallback,
        }
    }
}

impl Default for RoomAllocator<GreedyPacker> {
    fn default() -> Self {
        Self::new(FallbackPriceTable::default())
    }
}

impl<P: RoomPacker> RoomAllocator<P> {
    /// Use a different packing strategy; fairness correction is unchanged
    pub fn with_packer(packer: P, fallback: FallbackPriceTable) -> Self {
        Self { packer, fallback }
    }

    #[tracing::instrument(
        skip(self, travelers, inventory),
        fields(travelers = travelers.len(), room_types = inventory.0.len())
    )]
    pub fn allocate(
        &self,
        travelers: &[TravelerProfile],
        inventory: &RoomInventory,
        nights: u32,
    ) -> RoomAllocation {
        let empty_inventory = inventory.is_empty();
        let effective = if empty_inventory {
            let tier = dominant_tier(travelers);
            warn!("No room inventory supplied, estimating with {} tier prices", tier);
            self.fallback.inventory_for(tier)
        } else {
            inventory.clone()
        };

        let (private, sharing): (Vec<&TravelerProfile>, Vec<&TravelerProfile>) =
            travelers.iter().partition(|t| !t.sharing.is_sharing());

        let mut estimated = false;
        let mut assignments = Vec::new();

        for traveler in &private {
            // estimates price a private room by the traveler's own tier
            let room = if empty_inventory {
                single_room(traveler, &RoomInventory::new(), &self.fallback)
            } else {
                single_room(traveler, &effective, &self.fallback)
            };
            estimated |= room.estimated;
            assignments.push(RoomAssignment {
                room_type: room.room_type,
                capacity: room.capacity,
                per_occupant_cost: room.nightly_price,
                nominal_price: room.nightly_price,
                occupants: room.occupants,
                cohort: RoomCohort::Private,
            });
        }

        let packed = self.packer.pack(&sharing, &effective);
        let shared_rate = fair_share(&packed, sharing.len());
        if let Some(rate) = shared_rate {
            debug!(
                "Sharing cohort of {} pays {:.2} per night each across {} rooms",
                sharing.len(),
                rate,
                packed.len()
            );
        }

        for room in packed {
            estimated |= room.estimated || empty_inventory;
            assignments.push(RoomAssignment {
                room_type: room.room_type,
                capacity: room.capacity,
                per_occupant_cost: shared_rate.unwrap_or(room.nightly_price),
                nominal_price: room.nightly_price,
                occupants: room.occupants,
                cohort: RoomCohort::Shared,
            });
        }

        let traveler_costs = travelers
            .iter()
            .filter_map(|t| {
                assignments
                    .iter()
                    .find(|a| a.occupants.contains(&t.id))
                    .map(|a| TravelerCost {
                        traveler_id: t.id.clone(),
                        cost_per_night: a.per_occupant_cost,
                        total_cost: a.per_occupant_cost * f64::from(nights),
                    })
            })
            .collect();

        let summary = summarize(&assignments, estimated);
        info!("Room configuration: {}", summary);

        RoomAllocation {
            assignments,
            traveler_costs,
            nights,
            shared_rate,
            estimated,
            summary,
        }
    }
}

/// Pooled nightly price of the cohort's rooms divided by its head count
fn fair_share(rooms: &[PackedRoom], cohort_size: usize) -> Option<f64> {
    if cohort_size == 0 {
        return None;
    }
    let pooled: f64 = rooms.iter().map(|r| r.nightly_price).sum();
    Some(pooled / cohort_size as f64)
}

/// Most requested tier; ties fall back to standard
fn dominant_tier(travelers: &[TravelerProfile]) -> AccommodationTier {
    let mut counts: BTreeMap<AccommodationTier, usize> = BTreeMap::new();
    for traveler in travelers {
        *counts.entry(traveler.accommodation).or_insert(0) += 1;
    }
    let Some(top) = counts.values().copied().max() else {
        return AccommodationTier::Standard;
    };
    let leaders: Vec<AccommodationTier> = counts
        .into_iter()
        .filter(|(_, count)| *count == top)
        .map(|(tier, _)| tier)
        .collect();
    match leaders.as_slice() {
        [only] => *only,
        _ => AccommodationTier::Standard,
    }
}

fn summarize(assignments: &[RoomAssignment], estimated: bool) -> String {
    if assignments.is_empty() {
        return "no rooms".to_string();
    }
    let mut counts: BTreeMap<(Reverse<u32>, &str), usize> = BTreeMap::new();
    for a in assignments {
        *counts.entry((Reverse(a.capacity), a.room_type.as_str())).or_insert(0) += 1;
    }
    let summary = counts
        .into_iter()
        .map(|((_, name), count)| format!("{count}x {name}"))
        .collect::<Vec<_>>()
        .join(", ");
    if estimated {
        format!("{summary} (estimated)")
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SharingMode;

    const TOLERANCE: f64 = 1e-9;

    fn allocator() -> RoomAllocator {
        RoomAllocator::default()
    }

    fn create_test_traveler(id: &str, sharing: SharingMode) -> TravelerProfile {
        TravelerProfile::new(id, 5).with_sharing(sharing)
    }

    fn single_double() -> RoomInventory {
        RoomInventory::new()
            .with_room("single", 1, 100.0)
            .with_room("double", 2, 150.0)
    }

    #[test]
    fn test_three_sharers_pay_equal_share() {
        let travelers = vec![
            create_test_traveler("a", SharingMode::Share),
            create_test_traveler("b", SharingMode::Any),
            create_test_traveler("c", SharingMode::Share),
        ];

        let allocation = allocator().allocate(&travelers, &single_double(), 4);

        assert_eq!(allocation.summary, "1x double, 1x single");
        assert!(!allocation.estimated);
        let expected = 250.0 / 3.0;
        for cost in &allocation.traveler_costs {
            assert!((cost.cost_per_night - expected).abs() < TOLERANCE);
            assert!((cost.total_cost - expected * 4.0).abs() < TOLERANCE);
        }
        let reconstructed: f64 = allocation.traveler_costs.iter().map(|c| c.cost_per_night).sum();
        assert!((reconstructed - allocation.total_nightly_cost()).abs() < TOLERANCE);
        assert_eq!(allocation.total_nightly_cost(), 250.0);
    }

    #[test]
    fn test_private_travelers_pay_single_rate() {
        let travelers = vec![
            create_test_traveler("solo", SharingMode::Private),
            create_test_traveler("a", SharingMode::Share),
            create_test_traveler("b", SharingMode::Share),
        ];

        let allocation = allocator().allocate(&travelers, &single_double(), 2);

        assert_eq!(allocation.cost_for("solo").unwrap().cost_per_night, 100.0);
        assert_eq!(allocation.cost_for("a").unwrap().cost_per_night, 75.0);
        assert_eq!(allocation.cost_for("b").unwrap().cost_per_night, 75.0);
        assert_eq!(allocation.shared_rate, Some(75.0));
        assert_eq!(allocation.summary, "1x double, 1x single");
    }

    #[test]
    fn test_private_without_single_uses_tier_table() {
        let travelers = vec![
            create_test_traveler("solo", SharingMode::Private)
                .with_accommodation(AccommodationTier::Luxury),
        ];
        let inventory = RoomInventory::new().with_room("double", 2, 150.0);

        let allocation = allocator().allocate(&travelers, &inventory, 1);

        assert_eq!(allocation.cost_for("solo").unwrap().cost_per_night, 250.0);
        assert!(allocation.estimated);
    }

    #[test]
    fn test_greedy_prefers_largest_fitting_room() {
        let travelers: Vec<TravelerProfile> = (0..7)
            .map(|i| create_test_traveler(&format!("t{i}"), SharingMode::Any))
            .collect();
        let refs: Vec<&TravelerProfile> = travelers.iter().collect();
        let inventory = RoomInventory::new()
            .with_room("quad", 4, 260.0)
            .with_room("double", 2, 150.0)
            .with_room("single", 1, 100.0);

        let rooms = GreedyPacker::default().pack(&refs, &inventory);
        let names: Vec<&str> = rooms.iter().map(|r| r.room_type.as_str()).collect();

        assert_eq!(names, vec!["quad", "double", "single"]);
        assert_eq!(rooms.iter().map(|r| r.occupants.len()).sum::<usize>(), 7);
    }

    #[test]
    fn test_leftover_without_single_room() {
        let travelers: Vec<TravelerProfile> = (0..3)
            .map(|i| create_test_traveler(&format!("t{i}"), SharingMode::Share))
            .collect();
        let inventory = RoomInventory::new().with_room("double", 2, 160.0);

        let allocation = allocator().allocate(&travelers, &inventory, 3);

        // one double plus a standard-tier single estimate
        assert!(allocation.estimated);
        let expected = (160.0 + 120.0) / 3.0;
        assert!((allocation.shared_rate.unwrap() - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_empty_inventory_is_estimate() {
        let travelers = vec![
            create_test_traveler("a", SharingMode::Share)
                .with_accommodation(AccommodationTier::Budget),
            create_test_traveler("b", SharingMode::Share)
                .with_accommodation(AccommodationTier::Budget),
        ];

        let allocation = allocator().allocate(&travelers, &RoomInventory::new(), 2);

        assert!(allocation.estimated);
        assert_eq!(allocation.summary, "1x double (estimated)");
        assert_eq!(allocation.shared_rate, Some(45.0));
    }

    #[test]
    fn test_zero_nights_and_no_travelers() {
        let travelers = vec![create_test_traveler("a", SharingMode::Share)];
        let allocation = allocator().allocate(&travelers, &single_double(), 0);
        assert_eq!(allocation.traveler_costs[0].total_cost, 0.0);

        let empty = allocator().allocate(&[], &single_double(), 3);
        assert!(empty.assignments.is_empty());
        assert_eq!(empty.shared_rate, None);
        assert_eq!(empty.summary, "no rooms");
    }

    #[test]
    fn test_nobody_to_house_is_not_an_estimate() {
        let allocation = allocator().allocate(&[], &RoomInventory::new(), 3);

        assert!(!allocation.estimated);
        assert_eq!(allocation.summary, "no rooms");
    }

    #[test]
    fn test_zero_capacity_rooms_are_skipped() {
        let mut inventory = single_double();
        inventory.0.insert(
            "bunk".to_string(),
            RoomType {
                capacity: 0,
                nightly_price: 20.0,
            },
        );
        let travelers: Vec<TravelerProfile> = (0..3)
            .map(|i| create_test_traveler(&format!("t{i}"), SharingMode::Share))
            .collect();

        let allocation = allocator().allocate(&travelers, &inventory, 2);

        assert_eq!(allocation.summary, "1x double, 1x single");
        assert_eq!(allocation.traveler_costs.len(), 3);
        assert!(allocation.assignments.iter().all(|a| a.room_type != "bunk"));
    }

    #[test]
    fn test_only_zero_capacity_rooms_fall_back_to_singles() {
        let inventory: RoomInventory = serde_json::from_str(
            r#"{"bunk": {"capacity": 0, "nightly_price": 20.0}}"#,
        )
        .unwrap();
        let travelers = vec![create_test_traveler("a", SharingMode::Share)];
        let refs: Vec<&TravelerProfile> = travelers.iter().collect();

        let rooms = GreedyPacker::default().pack(&refs, &inventory);

        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].occupants, vec!["a"]);
        assert!(rooms[0].estimated);
    }

    #[test]
    fn test_empty_inventory_prices_private_room_by_own_tier() {
        let travelers = vec![
            create_test_traveler("a", SharingMode::Share)
                .with_accommodation(AccommodationTier::Budget),
            create_test_traveler("b", SharingMode::Any)
                .with_accommodation(AccommodationTier::Budget),
            create_test_traveler("lux", SharingMode::Private)
                .with_accommodation(AccommodationTier::Luxury),
        ];

        let allocation = allocator().allocate(&travelers, &RoomInventory::new(), 2);

        assert!(allocation.estimated);
        assert_eq!(allocation.shared_rate, Some(45.0));
        assert_eq!(allocation.cost_for("lux").unwrap().cost_per_night, 250.0);
        assert_eq!(allocation.cost_for("a").unwrap().cost_per_night, 45.0);
        assert_eq!(allocation.summary, "1x double, 1x single (estimated)");
    }

    #[test]
    fn test_dominant_tier_ties_to_standard() {
        let travelers = vec![
            create_test_traveler("a", SharingMode::Any)
                .with_accommodation(AccommodationTier::Budget),
            create_test_traveler("b", SharingMode::Any)
                .with_accommodation(AccommodationTier::Luxury),
        ];
        assert_eq!(dominant_tier(&travelers), AccommodationTier::Standard);
        assert_eq!(dominant_tier(&travelers[..1]), AccommodationTier::Budget);
    }

    struct OneRoomEach;

    impl RoomPacker for OneRoomEach {
        fn pack(&self, travelers: &[&TravelerProfile], _: &RoomInventory) -> Vec<PackedRoom> {
            travelers
                .iter()
                .enumerate()
                .map(|(i, t)| PackedRoom {
                    room_type: format!("room-{i}"),
                    capacity: 1,
                    nightly_price: 100.0 + 50.0 * i as f64,
                    occupants: vec![t.id.clone()],
                    estimated: false,
                })
                .collect()
        }
    }

    #[test]
    fn test_fairness_holds_for_any_packer() {
        let travelers = vec![
            create_test_traveler("a", SharingMode::Share),
            create_test_traveler("b", SharingMode::Share),
        ];
        let allocator = RoomAllocator::with_packer(OneRoomEach, FallbackPriceTable::default());

        let allocation = allocator.allocate(&travelers, &single_double(), 1);

        assert_eq!(allocation.cost_for("a").unwrap().cost_per_night, 125.0);
        assert_eq!(allocation.cost_for("b").unwrap().cost_per_night, 125.0);
        assert_eq!(allocation.total_nightly_cost(), 250.0);
    }
}
