//! End-to-end planning tests over the public library API

use chrono::NaiveDate;
use rstest::rstest;
use std::collections::BTreeSet;

use tripsync::models::{BudgetRange, RoomInventory, SharingMode};
use tripsync::planning::ConflictKind;
use tripsync::{
    AvailabilityResolver, Destination, DestinationScorer, InMemoryPlanMemo, PlanRequest,
    PlannerError, PreferenceAggregator, RoomAllocator, TravelerProfile, TripPlanner,
};

const DEMO_REQUEST: &str = include_str!("../demos/lisbon_trip.json");

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn demo_request() -> PlanRequest {
    PlanRequest::from_json(DEMO_REQUEST).unwrap()
}

#[test]
fn test_full_overlap_scenario() {
    let travelers: Vec<TravelerProfile> = [5, 6, 7]
        .iter()
        .enumerate()
        .map(|(i, d)| {
            TravelerProfile::new(format!("t{i}"), *d).with_date_range(date(6, 1), date(6, 10))
        })
        .collect();
    let ids: BTreeSet<&str> = travelers.iter().map(|t| t.id.as_str()).collect();

    let report = AvailabilityResolver::default().resolve(&travelers);
    let best = report.best().unwrap();

    assert_eq!(best.coverage, 1.0);
    assert!(best.start >= date(6, 1) && best.end <= date(6, 10));

    for window in &report.best_windows {
        let dates = window.dates();
        assert!(dates.windows(2).all(|w| w[1] - w[0] == chrono::Duration::days(1)));
        assert!(window.covering_travelers.iter().all(|id| ids.contains(id.as_str())));
        assert!(window.coverage >= 0.9 * best.coverage);
    }
}

#[test]
fn test_room_fairness_scenario() {
    let travelers: Vec<TravelerProfile> = ["a", "b", "c"]
        .iter()
        .map(|id| TravelerProfile::new(*id, 3).with_sharing(SharingMode::Share))
        .collect();
    let inventory = RoomInventory::new()
        .with_room("single", 1, 100.0)
        .with_room("double", 2, 150.0);

    let allocator: RoomAllocator = RoomAllocator::default();
    let allocation = allocator.allocate(&travelers, &inventory, 2);

    assert_eq!(allocation.assignments.len(), 2);
    assert!(!allocation.estimated);
    for cost in &allocation.traveler_costs {
        assert!((cost.cost_per_night - 250.0 / 3.0).abs() < 1e-9);
        assert!((cost.total_cost - 500.0 / 3.0).abs() < 1e-9);
    }
    let pooled: f64 = allocation.traveler_costs.iter().map(|c| c.cost_per_night).sum();
    assert!((pooled - allocation.total_nightly_cost()).abs() < 1e-9);
}

#[test]
fn test_destination_scoring_scenario() {
    let travelers: Vec<TravelerProfile> = (0..4)
        .map(|i| {
            TravelerProfile::new(format!("t{i}"), 5)
                .with_budget(500.0, 1000.0)
                .with_vibes(["beach", "party"])
        })
        .collect();
    let profile = PreferenceAggregator::default().aggregate(&travelers);
    let destination = Destination::new("Mykonos", 100.0).with_vibes(["beach", "party"]);

    let score = DestinationScorer::default().score(&destination, &profile, 5);

    assert_eq!(score.score, 29.0);
}

#[rstest]
#[case(BudgetRange::new(900.0, 1000.0), BudgetRange::new(200.0, 600.0), true)]
#[case(BudgetRange::new(500.0, 1000.0), BudgetRange::new(600.0, 1200.0), false)]
fn test_budget_inversion_flag(
    #[case] first: BudgetRange,
    #[case] second: BudgetRange,
    #[case] critical: bool,
) {
    let travelers = vec![
        TravelerProfile::new("a", 5).with_budget(first.min, first.max),
        TravelerProfile::new("b", 5).with_budget(second.min, second.max),
    ];
    let profile = PreferenceAggregator::default().aggregate(&travelers);
    assert_eq!(profile.has_critical_conflict(), critical);
    assert_eq!(profile.has_conflict(ConflictKind::BudgetIncompatible), critical);
}

#[test]
fn test_demo_request_plan() {
    let request = demo_request();
    let plan = TripPlanner::default().plan(&request).unwrap();

    assert_eq!(plan.window.start, date(6, 2));
    assert_eq!(plan.window.end, date(6, 6));
    assert_eq!(plan.window.coverage, 1.0);
    assert!(plan.conflicts().is_empty());

    assert_eq!(plan.destination, "Lisbon");
    assert_eq!(plan.destination_ranking[0].score, 25.0);
    assert_eq!(plan.destination_ranking[1].name, "Ibiza");

    assert_eq!(plan.rooms.nights, 4);
    assert_eq!(plan.rooms.shared_rate, Some(55.0));
    assert_eq!(plan.rooms.cost_for("cleo").unwrap().cost_per_night, 80.0);
    assert_eq!(plan.rooms.cost_for("ana").unwrap().total_cost, 220.0);

    let activities = &plan.activities;
    assert_eq!(activities.days.len(), 5);
    assert_eq!(activities.days[0].date, Some(date(6, 2)));
    assert_eq!(activities.days[0].activities.len(), 3);
    assert_eq!(activities.total_cost, 98.0);

    let names: Vec<&str> = activities
        .days
        .iter()
        .flat_map(|d| d.activities.iter().map(|s| s.activity.name.as_str()))
        .collect();
    let distinct: BTreeSet<&str> = names.iter().copied().collect();
    assert_eq!(names.len(), distinct.len());

    let hike = &activities.days[2].activities[0];
    assert_eq!(hike.activity.name, "Sintra hike");
    assert!(hike.backfilled);
}

#[test]
fn test_plan_is_deterministic_and_memoized() {
    let planner = TripPlanner::default();
    let request = demo_request();
    let mut memo = InMemoryPlanMemo::new();

    let direct = planner.plan(&request).unwrap();
    let first = planner.plan_with_memo(&request, &mut memo).unwrap();
    let second = planner.plan_with_memo(&request, &mut memo).unwrap();

    assert_eq!(direct, first);
    assert_eq!(first, second);
    assert_eq!(memo.len(), 1);
}

#[test]
fn test_disjoint_travelers_share_no_full_window() {
    let travelers = vec![
        TravelerProfile::new("a", 3).with_date_range(date(6, 1), date(6, 3)),
        TravelerProfile::new("b", 3).with_date_range(date(7, 1), date(7, 3)),
    ];
    let report = AvailabilityResolver::default().resolve(&travelers);

    // each window covers one traveler only
    assert!(report.best_windows.iter().all(|w| w.covering_count() == 1));
}

#[test]
fn test_no_available_dates_is_infeasible() {
    let request = PlanRequest::new(vec![TravelerProfile::new("a", 3)]);
    let err = TripPlanner::default().plan(&request).unwrap_err();

    assert!(err.is_infeasible());
    assert!(err.user_message().contains("no dates in common"));
}

#[test]
fn test_malformed_date_rejected_at_boundary() {
    let json = r#"{
        "travelers": [
            { "id": "a", "desired_duration": 3, "available_dates": ["2025-13-01"] }
        ]
    }"#;
    let err = PlanRequest::from_json(json).unwrap_err();
    assert!(matches!(err, PlannerError::Serialization { .. }));
}

#[test]
fn test_optional_fields_default() {
    let request = demo_request();
    let ben = &request.travelers[1];

    assert_eq!(ben.sharing, SharingMode::Any);
    assert_eq!(ben.accommodation, tripsync::models::AccommodationTier::Standard);
    assert_eq!(ben.role, tripsync::models::TravelerRole::Member);
}
