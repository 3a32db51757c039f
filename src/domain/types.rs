use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::DomainError;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque record identifier, assigned by the store at creation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Time Helper Types
// ============================================================================

/// Time of day with minute resolution, written as "HH:MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build from hour and minute, rejecting out-of-range values
    pub fn hm(hour: u32, minute: u32) -> Result<Self, DomainError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| DomainError::invalid(format!("invalid time {hour:02}:{minute:02}")))
    }

    /// Whole hour, clamped to 23:00
    pub fn at_hour(hour: u32) -> Self {
        Self(NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default())
    }

    /// Parse a strict 24h "HH:MM" string
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(DomainError::invalid(format!("time must be HH:MM, got '{s}'")));
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| DomainError::invalid(format!("time must be HH:MM, got '{s}'")))
    }

    /// Minutes elapsed since midnight
    pub fn minutes(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Day of the week; Monday is index 0
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn from_index(index: u8) -> Option<Self> {
        Weekday::iter().nth(index as usize)
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// A weekly schedule slot: day plus half-open [start, end) interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub day_of_week: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl Slot {
    pub fn new(day_of_week: u8, start_time: TimeOfDay, end_time: TimeOfDay) -> Result<Self, DomainError> {
        let slot = Self {
            day_of_week,
            start_time,
            end_time,
        };
        slot.check()?;
        Ok(slot)
    }

    /// Parse a slot from "HH:MM" bounds
    pub fn parse(day_of_week: u8, start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(day_of_week, TimeOfDay::parse(start)?, TimeOfDay::parse(end)?)
    }

    pub fn check(&self) -> Result<(), DomainError> {
        if self.day_of_week > 6 {
            return Err(DomainError::invalid(format!(
                "dayOfWeek must be 0-6, got {}",
                self.day_of_week
            )));
        }
        if self.start_time >= self.end_time {
            return Err(DomainError::invalid(format!(
                "startTime {} must be before endTime {}",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }

    pub fn weekday(&self) -> Option<Weekday> {
        Weekday::from_index(self.day_of_week)
    }

    /// Touching boundaries do not overlap
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.day_of_week == other.day_of_week
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    /// Whether the slot overlaps the given time range on its own day
    pub fn overlaps_range(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.start_time < end && start < self.end_time
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_time.minutes().saturating_sub(self.start_time.minutes())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weekday() {
            Some(day) => write!(f, "{} {}-{}", day, self.start_time, self.end_time),
            None => write!(f, "day{} {}-{}", self.day_of_week, self.start_time, self.end_time),
        }
    }
}

// ============================================================================
// Availability
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub available: bool,
}

impl TimeWindow {
    pub fn open(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            start,
            end,
            available: true,
        }
    }
}

/// Weekly availability windows keyed by weekday.
///
/// An empty map places no restriction; once any day is listed, days that are
/// absent are treated as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<Weekday, Vec<TimeWindow>>);

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same window on each of the given days
    pub fn uniform(days: &[Weekday], start: TimeOfDay, end: TimeOfDay) -> Self {
        let mut availability = Self::new();
        for day in days {
            availability.add(*day, TimeWindow::open(start, end));
        }
        availability
    }

    pub fn add(&mut self, day: Weekday, window: TimeWindow) {
        self.0.entry(day).or_default().push(window);
    }

    pub fn windows(&self, day: Weekday) -> &[TimeWindow] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the slot fits inside one available window of its weekday
    pub fn permits(&self, slot: &Slot) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        let Some(day) = slot.weekday() else {
            return false;
        };
        self.windows(day)
            .iter()
            .any(|w| w.available && w.start <= slot.start_time && slot.end_time <= w.end)
    }
}

// ============================================================================
// Field Checks
// ============================================================================

/// Patch field for an optional value: absent keeps it, `null` clears it
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn check_email(email: Option<&str>) -> Result<(), DomainError> {
    match email {
        Some(e) if !e.validate_email() => Err(DomainError::invalid(format!("invalid email '{e}'"))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    #[test]
    fn test_time_of_day_parse() {
        assert_eq!(t("09:30").minutes(), 570);
        assert_eq!(t("00:00").minutes(), 0);
        assert_eq!(t("23:59").to_string(), "23:59");
        assert!(TimeOfDay::parse("9:30").is_err());
        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("12:60").is_err());
        assert!(TimeOfDay::parse("noon").is_err());
    }

    #[test]
    fn test_time_of_day_serde() {
        let json = serde_json::to_string(&t("08:05")).unwrap();
        assert_eq!(json, "\"08:05\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("08:05"));
        assert!(serde_json::from_str::<TimeOfDay>("\"8:05\"").is_err());
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(Weekday::from_index(0), Some(Weekday::Monday));
        assert_eq!(Weekday::from_index(6), Some(Weekday::Sunday));
        assert_eq!(Weekday::from_index(7), None);
        assert_eq!(Weekday::Friday.index(), 4);
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!(Weekday::Tuesday.to_string(), "tuesday");
    }

    #[test]
    fn test_slot_rejects_inverted_interval() {
        assert!(Slot::parse(0, "10:00", "09:00").is_err());
        assert!(Slot::parse(0, "10:00", "10:00").is_err());
        assert!(Slot::parse(7, "09:00", "10:00").is_err());
        assert!(Slot::parse(6, "09:00", "10:00").is_ok());
    }

    #[test]
    fn test_slot_overlap() {
        let a = Slot::parse(0, "09:00", "10:00").unwrap();
        let b = Slot::parse(0, "09:30", "10:30").unwrap();
        let c = Slot::parse(0, "10:00", "11:00").unwrap();
        let d = Slot::parse(1, "09:00", "10:00").unwrap();

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
        assert_eq!(b.duration_minutes(), 60);
    }

    #[test]
    fn test_availability_permits() {
        let open = Availability::new();
        let slot = Slot::parse(2, "18:00", "19:00").unwrap();
        assert!(open.permits(&slot));

        let weekdays = Availability::uniform(&[Weekday::Monday, Weekday::Wednesday], t("09:00"), t("17:00"));
        assert!(!weekdays.permits(&slot));
        assert!(weekdays.permits(&Slot::parse(2, "09:00", "17:00").unwrap()));
        assert!(!weekdays.permits(&Slot::parse(1, "10:00", "11:00").unwrap()));
    }

    #[test]
    fn test_field_checks() {
        assert!(require_text("name", "  ").is_err());
        assert!(require_text("name", "A301").is_ok());
        assert!(check_email(None).is_ok());
        assert!(check_email(Some("sarah.wilson@university.edu")).is_ok());
        assert_eq!(check_email(Some("not-an-email")).unwrap_err().kind(), "InvalidInput");
    }

    #[test]
    fn test_availability_json_shape() {
        let json = r#"{"monday":[{"start":"09:00","end":"17:00","available":true}]}"#;
        let availability: Availability = serde_json::from_str(json).unwrap();
        assert_eq!(availability.windows(Weekday::Monday).len(), 1);
        assert!(availability.windows(Weekday::Friday).is_empty());
    }
}
