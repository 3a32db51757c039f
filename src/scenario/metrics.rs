use std::collections::{BTreeSet, HashSet};

use crate::config::{CalendarConfig, MetricsConfig};
use crate::domain::{EntityId, Faculty, Metrics, Room, TimetableEntry, Weekday};
use crate::schedule::count_conflicting_pairs;
use crate::validation::faculty_minutes;

/// Teaching cells of one day as minute ranges [start, end), lunch excluded
pub fn grid_cells(calendar: &CalendarConfig) -> Vec<(u32, u32)> {
    let step = calendar.slot_minutes;
    if step == 0 {
        return Vec::new();
    }
    let lunch = calendar.lunch().map(|(s, e)| (s.minutes(), e.minutes()));
    let day_end = calendar.day_end.minutes();

    let mut cells = Vec::new();
    let mut start = calendar.day_start.minutes();
    while let Some(end) = start.checked_add(step).filter(|end| *end <= day_end) {
        let in_lunch = lunch.is_some_and(|(ls, le)| start < le && ls < end);
        if !in_lunch {
            cells.push((start, end));
        }
        start = end;
    }
    cells
}

/// Occupied (room, day, cell) triples over the room-time available on the
/// grid, as a percentage. Entries in unknown rooms or off-grid days are
/// ignored.
pub fn room_utilization(entries: &[TimetableEntry], rooms: &[Room], calendar: &CalendarConfig) -> u8 {
    let days: BTreeSet<Weekday> = calendar.teaching_days.iter().copied().collect();
    let cells = grid_cells(calendar);
    let total = rooms.len() * days.len() * cells.len();
    if total == 0 {
        return 0;
    }

    let room_ids: HashSet<&EntityId> = rooms.iter().map(|r| &r.id).collect();
    let mut occupied: HashSet<(&EntityId, u8, usize)> = HashSet::new();
    for entry in entries {
        if !room_ids.contains(&entry.room_id) {
            continue;
        }
        let on_grid = Weekday::from_index(entry.day_of_week).is_some_and(|d| days.contains(&d));
        if !on_grid {
            continue;
        }
        let (start, end) = (entry.start_time.minutes(), entry.end_time.minutes());
        for (index, (cell_start, cell_end)) in cells.iter().enumerate() {
            if start < *cell_end && *cell_start < end {
                occupied.insert((&entry.room_id, entry.day_of_week, index));
            }
        }
    }

    percent(occupied.len() as f64 / total as f64)
}

/// Mean per-faculty load score. A member scores hours/max up to the cap and
/// loses score in proportion to any excess.
pub fn faculty_balance(entries: &[TimetableEntry], faculty: &[Faculty]) -> u8 {
    if faculty.is_empty() {
        return 0;
    }
    let total: f64 = faculty
        .iter()
        .map(|f| {
            let hours = faculty_minutes(&f.id, entries, None) as f64 / 60.0;
            let max = f.max_hours_per_week.max(1) as f64;
            if hours <= max {
                hours / max
            } else {
                (1.0 - (hours - max) / max).max(0.0)
            }
        })
        .sum();
    percent(total / faculty.len() as f64)
}

/// Entries that overlap the lunch break
pub fn lunch_overlaps(entries: &[TimetableEntry], calendar: &CalendarConfig) -> u32 {
    let Some((start, end)) = calendar.lunch() else {
        return 0;
    };
    entries.iter().filter(|e| e.slot().overlaps_range(start, end)).count() as u32
}

/// 100 minus the configured penalties, floored at zero
pub fn student_satisfaction(conflicts: u32, lunch_overlaps: u32, weights: &MetricsConfig) -> u8 {
    let penalty = conflicts
        .saturating_mul(weights.conflict_penalty)
        .saturating_add(lunch_overlaps.saturating_mul(weights.lunch_penalty));
    100u32.saturating_sub(penalty) as u8
}

/// Metrics of a scenario's full entry set. Pure: the same inputs always give
/// the same metrics.
pub fn compute_metrics(
    entries: &[TimetableEntry],
    rooms: &[Room],
    faculty: &[Faculty],
    calendar: &CalendarConfig,
    weights: &MetricsConfig,
) -> Metrics {
    let conflicts = count_conflicting_pairs(entries);
    Metrics {
        conflicts,
        student_satisfaction: student_satisfaction(conflicts, lunch_overlaps(entries, calendar), weights),
        faculty_balance: faculty_balance(entries, faculty),
        room_utilization: room_utilization(entries, rooms, calendar),
    }
}

fn percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}
