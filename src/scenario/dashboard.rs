use serde::Serialize;

use crate::domain::Metrics;
use crate::store::Store;

/// Entity counts plus the active scenario's stored metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_students: usize,
    pub total_faculty: usize,
    pub total_rooms: usize,
    pub conflicts: u32,
    pub student_satisfaction: u8,
    pub faculty_balance: u8,
    pub room_utilization: u8,
}

/// Read-only aggregation; metrics are zero when no scenario is active
pub fn summarize(store: &Store) -> DashboardSummary {
    let metrics = store
        .active_scenario()
        .map(|s| s.metrics)
        .unwrap_or_default();
    let Metrics {
        conflicts,
        student_satisfaction,
        faculty_balance,
        room_utilization,
    } = metrics;

    DashboardSummary {
        total_students: store.students.count(),
        total_faculty: store.faculty.count(),
        total_rooms: store.rooms.count(),
        conflicts,
        student_satisfaction,
        faculty_balance,
        room_utilization,
    }
}
