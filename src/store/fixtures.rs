//! Demo data for a fresh store: a small education department with one
//! active scenario.

use std::collections::BTreeSet;

use super::Store;
use crate::domain::{
    Availability, CourseType, EntityId, NewCourse, NewFaculty, NewRoom, NewScenario, NewStudent,
    NewTimetableEntry, NewUser, Preferences, Program, Role, RoomType, Slot, TimeOfDay, TimeWindow,
    Weekday,
};
use crate::error::DomainError;

const WEEKDAYS: [Weekday; 5] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
];

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn hours(start: &str, end: &str) -> Result<(TimeOfDay, TimeOfDay), DomainError> {
    Ok((TimeOfDay::parse(start)?, TimeOfDay::parse(end)?))
}

/// Availability open on weekdays, with a shorter day on the listed ones
fn weekday_availability(
    start: &str,
    end: &str,
    short_days: &[Weekday],
    short_end: &str,
) -> Result<Availability, DomainError> {
    let (open, close) = hours(start, end)?;
    let early_close = TimeOfDay::parse(short_end)?;
    let mut availability = Availability::new();
    for day in WEEKDAYS {
        let until = if short_days.contains(&day) { early_close } else { close };
        availability.add(day, TimeWindow::open(open, until));
    }
    Ok(availability)
}

/// Seed `store` with the demo department. Returns the active scenario id.
pub fn seed(store: &Store) -> Result<EntityId, DomainError> {
    for (username, role, email) in [
        ("admin", Role::Admin, "admin@university.edu"),
        ("faculty", Role::Faculty, "faculty@university.edu"),
        ("student", Role::Student, "student@university.edu"),
    ] {
        store.users.create(NewUser {
            username: username.to_string(),
            role,
            email: Some(email.to_string()),
        })?;
    }

    let mut alice = NewStudent::new("2024001", "Alice Johnson", Program::BEd, 3)
        .with_section("A")
        .with_credits(18);
    alice.email = Some("alice@student.edu".to_string());
    alice.preferences = Preferences {
        majors: list(&["Education Technology", "Curriculum Development"]),
        minors: list(&["Psychology"]),
        skills: list(&["Research Methods", "Data Analysis"]),
        aec: list(&["Environmental Studies"]),
        vac: list(&["Sports & Wellness"]),
    };
    store.students.create(alice)?;

    let mut bob = NewStudent::new("2024002", "Bob Smith", Program::MEd, 2)
        .with_section("B")
        .with_credits(20);
    bob.email = Some("bob@student.edu".to_string());
    bob.preferences = Preferences {
        majors: list(&["Educational Leadership"]),
        minors: list(&["Statistics"]),
        skills: list(&["Communication"]),
        aec: list(&["Constitutional Studies"]),
        vac: list(&["Arts & Culture"]),
    };
    store.students.create(bob)?;

    let mut wilson = NewFaculty::new("FAC001", "Dr. Sarah Wilson", "Education")
        .with_max_hours(20)
        .with_availability(weekday_availability(
            "09:00",
            "17:00",
            &[Weekday::Wednesday, Weekday::Friday],
            "15:00",
        )?);
    wilson.email = Some("sarah.wilson@university.edu".to_string());
    wilson.expertise = set(&["Curriculum Development", "Educational Technology", "Assessment"]);
    let wilson = store.faculty.create(wilson)?;

    let mut brown = NewFaculty::new("FAC002", "Prof. Michael Brown", "Mathematics")
        .with_max_hours(18)
        .with_availability(weekday_availability("10:00", "16:00", &[Weekday::Friday], "14:00")?);
    brown.email = Some("michael.brown@university.edu".to_string());
    brown.expertise = set(&["Statistics", "Research Methods", "Data Analysis"]);
    let brown = store.faculty.create(brown)?;

    let mut edu101 = NewCourse::new("EDU101", "Foundations of Education", 4, CourseType::Major)
        .with_max_enrollment(40);
    edu101.theory_hours = 3;
    edu101.practical_hours = 1;
    edu101.department = Some("Education".to_string());
    edu101.semester = Some(1);
    let edu101 = store.courses.create(edu101)?;

    let mut psy201 = NewCourse::new("PSY201", "Educational Psychology", 3, CourseType::Minor)
        .with_max_enrollment(30);
    psy201.theory_hours = 3;
    psy201.prerequisites = list(&["EDU101"]);
    psy201.department = Some("Psychology".to_string());
    psy201.semester = Some(2);
    psy201.is_elective = true;
    let psy201 = store.courses.create(psy201)?;

    let mut skill101 = NewCourse::new("SKILL101", "Communication Skills", 2, CourseType::Skill)
        .with_max_enrollment(25);
    skill101.theory_hours = 1;
    skill101.practical_hours = 1;
    skill101.department = Some("Languages".to_string());
    skill101.semester = Some(1);
    let skill101 = store.courses.create(skill101)?;

    let mut lab101 = NewCourse::new("LAB101", "Computer Lab", 2, CourseType::Lab)
        .with_max_enrollment(20);
    lab101.practical_hours = 2;
    lab101.department = Some("Computer Science".to_string());
    lab101.semester = Some(1);
    let lab101 = store.courses.create(lab101)?;

    let (open, close) = hours("09:00", "17:00")?;
    let mut a301 = NewRoom::new("A301", RoomType::Classroom, 40);
    a301.building = Some("Academic Block A".to_string());
    a301.floor = Some(3);
    a301.features = set(&["projector", "smart_board", "air_conditioning"]);
    a301.availability = Availability::uniform(&WEEKDAYS, open, close);
    let a301 = store.rooms.create(a301)?;

    let mut it_lab = NewRoom::new("IT-LAB-01", RoomType::Lab, 30);
    it_lab.building = Some("IT Block".to_string());
    it_lab.floor = Some(1);
    it_lab.features = set(&["computers", "projector", "lab_benches", "internet"]);
    it_lab.availability = Availability::uniform(&WEEKDAYS, open, close);
    let it_lab = store.rooms.create(it_lab)?;

    let scenario = store.scenarios.create(
        NewScenario::new("Current Semester")
            .with_description("Active timetable for current academic semester")
            .active(),
    )?;

    let scope = Some(scenario.id.clone());
    let sessions = [
        (&edu101.id, &wilson.id, &a301.id, "A", Slot::parse(0, "09:00", "10:00")?),
        (&psy201.id, &brown.id, &a301.id, "B", Slot::parse(0, "10:00", "11:00")?),
        (&skill101.id, &wilson.id, &a301.id, "A", Slot::parse(1, "11:00", "12:00")?),
        (&lab101.id, &brown.id, &it_lab.id, "A", Slot::parse(2, "14:00", "16:00")?),
    ];
    for (course, faculty, room, group, slot) in sessions {
        store.entries.create(
            NewTimetableEntry::new(scope.clone(), course.clone(), faculty.clone(), room.clone(), slot)
                .with_group(group),
        )?;
    }

    Ok(scenario.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_populates_every_kind() {
        let store = Store::in_memory();
        let scenario_id = seed(&store).unwrap();

        assert_eq!(store.users.count(), 3);
        assert_eq!(store.students.count(), 2);
        assert_eq!(store.faculty.count(), 2);
        assert_eq!(store.courses.count(), 4);
        assert_eq!(store.rooms.count(), 2);
        assert_eq!(store.active_scenario().map(|s| s.id), Some(scenario_id.clone()));
        assert_eq!(store.list_entries(Some(&scenario_id)).len(), 4);
    }

    #[test]
    fn test_seed_twice_hits_unique_keys() {
        let store = Store::in_memory();
        seed(&store).unwrap();
        assert_eq!(seed(&store).unwrap_err().kind(), "DuplicateKey");
    }
}
