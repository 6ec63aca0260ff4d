//! Configuration management for the `TripSync` engine
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all tunable planning thresholds.

use crate::PlannerError;
use crate::models::room::{FallbackPriceTable, TierRates};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TripSync` engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Date window resolution settings
    pub availability: AvailabilityConfig,
    /// Conflict detection settings
    pub preferences: PreferencesConfig,
    /// Destination scoring weights
    pub scoring: ScoringConfig,
    /// Room allocation settings
    pub rooms: RoomsConfig,
    /// Activity scheduling settings
    pub activities: ActivitiesConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Date window resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Share of the best coverage a window needs to be kept
    #[serde(default = "default_coverage_threshold")]
    pub coverage_threshold: f64,
    /// Share of all travelers a near-miss window needs to cover
    #[serde(default = "default_near_miss_coverage")]
    pub near_miss_coverage: f64,
    /// Maximum number of near-miss windows reported
    #[serde(default = "default_near_miss_limit")]
    pub near_miss_limit: usize,
}

/// Conflict detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Duration spread (days) above which a warning is raised
    #[serde(default = "default_duration_spread")]
    pub duration_spread_warning_days: u32,
}

/// Destination scoring weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_vibe_weight")]
    pub vibe_weight: f64,
    #[serde(default = "default_interest_weight")]
    pub interest_weight: f64,
    /// Bonus when the whole trip costs no more than the group minimum
    #[serde(default = "default_under_min_bonus")]
    pub under_min_bonus: f64,
    /// Bonus when the trip cost falls inside the group band
    #[serde(default = "default_within_band_bonus")]
    pub within_band_bonus: f64,
    /// Penalty (negative) when the trip cost exceeds the group maximum
    #[serde(default = "default_over_budget_penalty")]
    pub over_budget_penalty: f64,
}

/// Room allocation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomsConfig {
    /// Static nightly prices used when no inventory is supplied
    #[serde(default)]
    pub fallback: FallbackPriceTable,
}

/// Activity scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitiesConfig {
    /// Fraction of the per-person budget reserved for activities
    #[serde(default = "default_budget_share")]
    pub budget_share: f64,
    /// Precipitation probability (%) at which outdoor activities are skipped
    #[serde(default = "default_rain_threshold")]
    pub rain_threshold_percent: u8,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_coverage_threshold() -> f64 {
    0.9
}

fn default_near_miss_coverage() -> f64 {
    0.8
}

fn default_near_miss_limit() -> usize {
    10
}

fn default_duration_spread() -> u32 {
    3
}

fn default_vibe_weight() -> f64 {
    3.0
}

fn default_interest_weight() -> f64 {
    2.0
}

fn default_under_min_bonus() -> f64 {
    5.0
}

fn default_within_band_bonus() -> f64 {
    2.0
}

fn default_over_budget_penalty() -> f64 {
    -5.0
}

fn default_budget_share() -> f64 {
    0.3
}

fn default_rain_threshold() -> u8 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            coverage_threshold: default_coverage_threshold(),
            near_miss_coverage: default_near_miss_coverage(),
            near_miss_limit: default_near_miss_limit(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            duration_spread_warning_days: default_duration_spread(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            vibe_weight: default_vibe_weight(),
            interest_weight: default_interest_weight(),
            under_min_bonus: default_under_min_bonus(),
            within_band_bonus: default_within_band_bonus(),
            over_budget_penalty: default_over_budget_penalty(),
        }
    }
}

impl Default for ActivitiesConfig {
    fn default() -> Self {
        Self {
            budget_share: default_budget_share(),
            rain_threshold_percent: default_rain_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPSYNC_SCORING__VIBE_WEIGHT=4 overrides scoring.vibe_weight
        builder = builder.add_source(
            Environment::with_prefix("TRIPSYNC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripsync").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.availability.coverage_threshold == 0.0 {
            self.availability.coverage_threshold = default_coverage_threshold();
        }
        if self.availability.near_miss_coverage == 0.0 {
            self.availability.near_miss_coverage = default_near_miss_coverage();
        }
        if self.availability.near_miss_limit == 0 {
            self.availability.near_miss_limit = default_near_miss_limit();
        }
        if self.activities.budget_share == 0.0 {
            self.activities.budget_share = default_budget_share();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_thresholds()?;
        self.validate_prices()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate fractional thresholds and percentages
    fn validate_thresholds(&self) -> Result<()> {
        let fractions = [
            ("availability.coverage_threshold", self.availability.coverage_threshold),
            ("availability.near_miss_coverage", self.availability.near_miss_coverage),
            ("activities.budget_share", self.activities.budget_share),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(PlannerError::config(format!(
                    "{name} must be within (0, 1], got {value}"
                ))
                .into());
            }
        }

        if self.activities.rain_threshold_percent > 100 {
            return Err(PlannerError::config(
                "activities.rain_threshold_percent cannot exceed 100",
            )
            .into());
        }

        if self.scoring.over_budget_penalty > 0.0 {
            return Err(PlannerError::config(
                "scoring.over_budget_penalty must not be positive",
            )
            .into());
        }

        Ok(())
    }

    /// Validate the static fallback price table
    fn validate_prices(&self) -> Result<()> {
        let tiers: [(&str, &TierRates); 3] = [
            ("budget", &self.rooms.fallback.budget),
            ("standard", &self.rooms.fallback.standard),
            ("luxury", &self.rooms.fallback.luxury),
        ];
        for (tier, rates) in tiers {
            if rates.single <= 0.0 || rates.double <= 0.0 {
                return Err(PlannerError::config(format!(
                    "Fallback prices for tier '{tier}' must be positive"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.availability.coverage_threshold, 0.9);
        assert_eq!(config.availability.near_miss_limit, 10);
        assert_eq!(config.scoring.vibe_weight, 3.0);
        assert_eq!(config.scoring.over_budget_penalty, -5.0);
        assert_eq!(config.activities.budget_share, 0.3);
        assert_eq!(config.rooms.fallback.standard.single, 120.0);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = PlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_threshold_range() {
        let mut config = PlannerConfig::default();
        config.availability.coverage_threshold = 1.5;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("coverage_threshold"));
    }

    #[test]
    fn test_config_validation_fallback_prices() {
        let mut config = PlannerConfig::default();
        config.rooms.fallback.luxury.double = 0.0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("luxury"));
    }

    #[test]
    fn test_apply_defaults_repairs_zeroes() {
        let mut config = PlannerConfig::default();
        config.availability.near_miss_limit = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.availability.near_miss_limit, 10);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[scoring]\nvibe_weight = 4.0\n\n[activities]\nrain_threshold_percent = 70"
        )
        .unwrap();

        let config = PlannerConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.scoring.vibe_weight, 4.0);
        assert_eq!(config.scoring.interest_weight, 2.0);
        assert_eq!(config.activities.rain_threshold_percent, 70);
        assert_eq!(config.availability.coverage_threshold, 0.9);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = PlannerConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("tripsync"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
