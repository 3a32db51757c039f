use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;

use crate::domain::{TimeOfDay, Weekday};
use crate::validation::LoadPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub telemetry: TelemetryConfig,
    pub calendar: CalendarConfig,
    pub policy: LoadPolicy,
    pub metrics: MetricsConfig,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Load the demo department into a fresh store
    pub seed_fixtures: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { seed_fixtures: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub json: bool,
    /// Used when RUST_LOG is unset
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json: false,
            default_filter: "info,timetable_manager=debug".to_string(),
        }
    }
}

/// Weekly teaching grid used for room utilisation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub teaching_days: Vec<Weekday>,
    pub day_start: TimeOfDay,
    pub day_end: TimeOfDay,
    pub slot_minutes: u32,
    pub lunch_start: Option<TimeOfDay>,
    pub lunch_end: Option<TimeOfDay>,
}

impl CalendarConfig {
    /// Lunch window, if both ends are set and ordered
    pub fn lunch(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        match (self.lunch_start, self.lunch_end) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            teaching_days: vec![
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
            ],
            day_start: TimeOfDay::at_hour(9),
            day_end: TimeOfDay::at_hour(17),
            slot_minutes: 60,
            lunch_start: Some(TimeOfDay::at_hour(12)),
            lunch_end: Some(TimeOfDay::at_hour(13)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Satisfaction points lost per conflicting pair
    pub conflict_penalty: u32,
    /// Satisfaction points lost per entry overlapping lunch
    pub lunch_penalty: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            conflict_penalty: 10,
            lunch_penalty: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub delay_ms: u64,
    pub timeout_ms: u64,
    pub run_on_start: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            timeout_ms: 10_000,
            run_on_start: false,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("TIMETABLE__").split("__"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Enforcement;

    #[test]
    fn test_empty_source_yields_defaults() {
        let cfg = Config::from_figment(Figment::new()).unwrap();
        assert!(cfg.store.seed_fixtures);
        assert_eq!(cfg.calendar.teaching_days.len(), 5);
        assert_eq!(cfg.calendar.day_start.to_string(), "09:00");
        assert_eq!(cfg.policy.faculty_hours, Enforcement::Warn);
        assert_eq!(cfg.generator.delay_ms, 2000);
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            [calendar]
            teaching_days = ["monday", "saturday"]
            day_start = "08:30"
            slot_minutes = 30

            [policy]
            faculty_hours = "block"

            [metrics]
            conflict_penalty = 5
        "#;
        let cfg = Config::from_figment(Figment::new().merge(Toml::string(toml))).unwrap();

        assert_eq!(cfg.calendar.teaching_days, vec![Weekday::Monday, Weekday::Saturday]);
        assert_eq!(cfg.calendar.day_start.to_string(), "08:30");
        assert_eq!(cfg.calendar.day_end.to_string(), "17:00");
        assert_eq!(cfg.calendar.slot_minutes, 30);
        assert_eq!(cfg.policy.faculty_hours, Enforcement::Block);
        assert_eq!(cfg.policy.room_capacity, Enforcement::Warn);
        assert_eq!(cfg.metrics.conflict_penalty, 5);
        assert_eq!(cfg.metrics.lunch_penalty, 2);
    }

    #[test]
    fn test_bad_time_rejected() {
        let toml = r#"
            [calendar]
            day_start = "9am"
        "#;
        assert!(Config::from_figment(Figment::new().merge(Toml::string(toml))).is_err());
    }

    #[test]
    fn test_lunch_window() {
        let mut calendar = CalendarConfig::default();
        assert!(calendar.lunch().is_some());
        calendar.lunch_end = None;
        assert!(calendar.lunch().is_none());
    }
}
