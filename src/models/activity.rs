//! Activity pool, pace, daily weather and the resulting day-by-day plan

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad activity category used to match group interests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Cultural,
    Outdoor,
    Adventure,
    Food,
    Nightlife,
    Relaxation,
    Shopping,
    Entertainment,
    Other,
}

impl ActivityCategory {
    /// Map a free-form interest tag onto a category
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match super::normalize_tag(tag).as_str() {
            "culture" | "cultural" | "museum" | "museums" | "history" | "art" | "architecture"
            | "sightseeing" => ActivityCategory::Cultural,
            "outdoor" | "outdoors" | "nature" | "hiking" | "beach" | "beaches" | "parks" => {
                ActivityCategory::Outdoor
            }
            "adventure" | "sports" | "diving" | "climbing" | "surfing" | "skiing" => {
                ActivityCategory::Adventure
            }
            "food" | "foodie" | "dining" | "cuisine" | "wine" | "restaurants" => {
                ActivityCategory::Food
            }
            "nightlife" | "bars" | "party" | "clubs" => ActivityCategory::Nightlife,
            "relaxation" | "relax" | "wellness" | "spa" => ActivityCategory::Relaxation,
            "shopping" | "markets" => ActivityCategory::Shopping,
            "entertainment" | "shows" | "music" | "theatre" | "theater" => {
                ActivityCategory::Entertainment
            }
            _ => ActivityCategory::Other,
        }
    }

    /// Categories that are skipped on rainy days
    #[must_use]
    pub fn is_outdoor(self) -> bool {
        matches!(self, ActivityCategory::Outdoor | ActivityCategory::Adventure)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityCategory::Cultural => "cultural",
            ActivityCategory::Outdoor => "outdoor",
            ActivityCategory::Adventure => "adventure",
            ActivityCategory::Food => "food",
            ActivityCategory::Nightlife => "nightlife",
            ActivityCategory::Relaxation => "relaxation",
            ActivityCategory::Shopping => "shopping",
            ActivityCategory::Entertainment => "entertainment",
            ActivityCategory::Other => "other",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate activity from the places collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub category: ActivityCategory,
    #[serde(default)]
    pub cost_per_person: f64,
    /// Duration in hours
    #[serde(default)]
    pub duration_hours: f64,
    #[serde(default)]
    pub rating: f64,
}

impl Activity {
    #[must_use]
    pub fn new(name: impl Into<String>, category: ActivityCategory, cost_per_person: f64) -> Self {
        Self {
            name: name.into(),
            category,
            cost_per_person,
            duration_hours: 2.0,
            rating: 0.0,
        }
    }
}

/// How full each day should be
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    #[default]
    Balanced,
    Packed,
}

impl Pace {
    /// Minimum and maximum number of activities per day
    #[must_use]
    pub fn daily_range(self) -> (usize, usize) {
        match self {
            Pace::Relaxed => (1, 2),
            Pace::Balanced => (2, 3),
            Pace::Packed => (3, 4),
        }
    }
}

/// Forecast signal for one trip day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    /// Maximum temperature in Celsius
    pub max_temperature: f32,
    /// Precipitation probability (0-100%)
    pub precipitation_probability: u8,
}

/// An activity placed on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledActivity {
    pub activity: Activity,
    /// Added to reach the pace minimum regardless of the day budget
    pub backfilled: bool,
}

/// Activities for one trip day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day index, never above the trip length
    pub day: u32,
    pub date: Option<NaiveDate>,
    pub activities: Vec<ScheduledActivity>,
    /// Per-person cost of the day
    pub cost: f64,
}

impl DayPlan {
    #[must_use]
    pub fn is_over_budget(&self, daily_budget: f64) -> bool {
        self.cost > daily_budget
    }
}

/// Day-indexed activity plan for the whole trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityPlan {
    pub days: Vec<DayPlan>,
    /// Per-person activity budget for each day
    pub daily_budget: f64,
    /// Per-person activity cost for the whole trip
    pub total_cost: f64,
}

impl ActivityPlan {
    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|d| d.activities.len()).sum()
    }
}
