//! Activity scheduling
//!
//! Spreads a ranked activity pool over the trip days, following the group's
//! interests, the day of the week, the weather and a per-day budget.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::config::ActivitiesConfig;
use crate::models::{
    Activity, ActivityCategory, ActivityPlan, DailyWeather, DayPlan, Pace, ScheduledActivity,
};
use crate::planning::preferences::GroupProfile;

/// Inputs for one scheduling run
#[derive(Debug, Clone)]
pub struct ActivityRequest<'a> {
    /// Ranked pool, best first
    pub pool: &'a [Activity],
    /// Group interest categories, most popular first
    pub interests: Vec<ActivityCategory>,
    pub trip_length: u32,
    pub pace: Pace,
    /// Total per-person trip budget
    pub per_person_budget: f64,
    pub start_date: Option<NaiveDate>,
    /// Forecast by trip day, index 0 is day 1
    pub weather: &'a [DailyWeather],
}

impl<'a> ActivityRequest<'a> {
    #[must_use]
    pub fn new(pool: &'a [Activity], trip_length: u32) -> Self {
        Self {
            pool,
            interests: Vec::new(),
            trip_length,
            pace: Pace::default(),
            per_person_budget: 0.0,
            start_date: None,
            weather: &[],
        }
    }

    /// Take the interest ranking from the group profile
    #[must_use]
    pub fn with_profile(mut self, profile: &GroupProfile) -> Self {
        self.interests = interest_categories(profile);
        self
    }

    #[must_use]
    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    #[must_use]
    pub fn with_budget(mut self, per_person_budget: f64) -> Self {
        self.per_person_budget = per_person_budget;
        self
    }

    #[must_use]
    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub fn with_weather(mut self, weather: &'a [DailyWeather]) -> Self {
        self.weather = weather;
        self
    }
}

/// Map ranked interest tags to distinct categories, unknown tags dropped
#[must_use]
pub fn interest_categories(profile: &GroupProfile) -> Vec<ActivityCategory> {
    let mut seen = BTreeSet::new();
    profile
        .ranked_interests()
        .into_iter()
        .map(ActivityCategory::from_tag)
        .filter(|c| *c != ActivityCategory::Other && seen.insert(*c))
        .collect()
}

/// Extra weight a category gets on a given weekday
fn weekday_bonus(category: ActivityCategory, weekday: Weekday) -> f64 {
    use ActivityCategory::{Adventure, Cultural, Nightlife, Outdoor, Relaxation};
    use Weekday::{Fri, Sat, Sun, Thu, Tue, Wed};

    match (category, weekday) {
        (Nightlife, Fri | Sat) => 2.0,
        (Cultural, Tue | Wed | Thu) => 1.5,
        (Outdoor | Adventure, Sat | Sun) => 1.5,
        (Relaxation, Sun) => 1.5,
        _ => 0.0,
    }
}

/// Builds a day-indexed plan from an activity pool
#[derive(Debug, Clone)]
pub struct ActivityScheduler {
    budget_share: f64,
    rain_threshold_percent: u8,
}

impl Default for ActivityScheduler {
    fn default() -> Self {
        Self::new(&ActivitiesConfig::default())
    }
}

impl ActivityScheduler {
    #[must_use]
    pub fn new(config: &ActivitiesConfig) -> Self {
        Self {
            budget_share: config.budget_share,
            rain_threshold_percent: config.rain_threshold_percent,
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(days = request.trip_length, pool = request.pool.len())
    )]
    pub fn schedule(&self, request: &ActivityRequest<'_>) -> ActivityPlan {
        if request.trip_length == 0 {
            return ActivityPlan::default();
        }

        let daily_budget =
            request.per_person_budget * self.budget_share / f64::from(request.trip_length);
        let base_order = preferred_order(request);
        let (min_count, max_count) = request.pace.daily_range();
        let mut used = vec![false; request.pool.len()];
        let mut days = Vec::new();

        for day in 1..=request.trip_length {
            let offset = (day - 1) as usize;
            let date = request
                .start_date
                .map(|start| start + Duration::days(i64::from(day - 1)));
            let rainy = request
                .weather
                .get(offset)
                .is_some_and(|w| w.precipitation_probability >= self.rain_threshold_percent);
            let order = match date {
                Some(date) => reorder_for_weekday(&base_order, date.weekday()),
                None => base_order.clone(),
            };

            let mut chosen: Vec<ScheduledActivity> = Vec::new();
            let mut remaining = daily_budget;

            // one activity per preferred category per pass
            'fill: loop {
                let mut progress = false;
                for category in &order {
                    if chosen.len() >= max_count {
                        break 'fill;
                    }
                    if rainy && category.is_outdoor() {
                        continue;
                    }
                    let pick = request.pool.iter().zip(&used).position(|(a, taken)| {
                        !taken && a.category == *category && a.cost_per_person <= remaining
                    });
                    if let Some(i) = pick {
                        used[i] = true;
                        remaining -= request.pool[i].cost_per_person;
                        chosen.push(ScheduledActivity {
                            activity: request.pool[i].clone(),
                            backfilled: false,
                        });
                        progress = true;
                    }
                }
                if !progress {
                    break;
                }
            }

            if chosen.len() < min_count {
                debug!(
                    "Day {} has {} of {} activities, backfilling over budget",
                    day,
                    chosen.len(),
                    min_count
                );
                for (i, activity) in request.pool.iter().enumerate() {
                    if chosen.len() >= min_count {
                        break;
                    }
                    if used[i] || (rainy && activity.category.is_outdoor()) {
                        continue;
                    }
                    used[i] = true;
                    chosen.push(ScheduledActivity {
                        activity: activity.clone(),
                        backfilled: true,
                    });
                }
            }

            let cost = chosen.iter().map(|s| s.activity.cost_per_person).sum();
            days.push(DayPlan {
                day,
                date,
                activities: chosen,
                cost,
            });
        }

        let total_cost = days.iter().map(|d| d.cost).sum();
        let plan = ActivityPlan {
            days,
            daily_budget,
            total_cost,
        };
        info!(
            "Scheduled {} activities over {} days, {:.2} per person",
            plan.activity_count(),
            request.trip_length,
            plan.total_cost
        );
        plan
    }
}

/// Interest categories, or the pool's own categories when the group named none
fn preferred_order(request: &ActivityRequest<'_>) -> Vec<ActivityCategory> {
    if !request.interests.is_empty() {
        return request.interests.clone();
    }
    let mut seen = BTreeSet::new();
    request
        .pool
        .iter()
        .map(|a| a.category)
        .filter(|c| seen.insert(*c))
        .collect()
}

/// Combine interest rank with the weekday table; ties keep interest order
fn reorder_for_weekday(order: &[ActivityCategory], weekday: Weekday) -> Vec<ActivityCategory> {
    let n = order.len();
    let mut weighted: Vec<(ActivityCategory, f64)> = order
        .iter()
        .enumerate()
        .map(|(rank, c)| (*c, (n - rank) as f64 + weekday_bonus(*c, weekday)))
        .collect();
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
    weighted.into_iter().map(|(c, _)| c).collect()
}
