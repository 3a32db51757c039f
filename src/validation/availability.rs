use super::{AvailabilitySubject, LoadViolation};
use crate::domain::{Faculty, Room, Slot};

pub fn check_faculty_availability(faculty: &Faculty, slot: &Slot) -> Option<LoadViolation> {
    (!faculty.availability.permits(slot)).then(|| LoadViolation::OutsideAvailability {
        subject: AvailabilitySubject::Faculty,
        id: faculty.id.clone(),
        slot: *slot,
    })
}

pub fn check_room_availability(room: &Room, slot: &Slot) -> Option<LoadViolation> {
    (!room.availability.permits(slot)).then(|| LoadViolation::OutsideAvailability {
        subject: AvailabilitySubject::Room,
        id: room.id.clone(),
        slot: *slot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Availability, EntityId, NewFaculty, NewRoom, RoomType, TimeOfDay, Weekday};
    use crate::store::Record;
    use chrono::Utc;

    #[test]
    fn test_unrestricted_room_always_available() {
        let room = Room::build(EntityId::from("r1"), Utc::now(), NewRoom::new("A301", RoomType::Classroom, 40));
        let late = Slot::parse(6, "20:00", "21:00").unwrap();
        assert_eq!(check_room_availability(&room, &late), None);
    }

    #[test]
    fn test_faculty_outside_window() {
        let availability = Availability::uniform(
            &[Weekday::Monday],
            TimeOfDay::parse("09:00").unwrap(),
            TimeOfDay::parse("17:00").unwrap(),
        );
        let faculty = Faculty::build(
            EntityId::from("f1"),
            Utc::now(),
            NewFaculty::new("FAC001", "Dr. Wilson", "Education").with_availability(availability),
        );

        let inside = Slot::parse(0, "16:00", "17:00").unwrap();
        let spills = Slot::parse(0, "16:30", "17:30").unwrap();
        let tuesday = Slot::parse(1, "10:00", "11:00").unwrap();

        assert_eq!(check_faculty_availability(&faculty, &inside), None);
        assert!(check_faculty_availability(&faculty, &spills).is_some());
        assert_eq!(
            check_faculty_availability(&faculty, &tuesday),
            Some(LoadViolation::OutsideAvailability {
                subject: AvailabilitySubject::Faculty,
                id: EntityId::from("f1"),
                slot: tuesday,
            })
        );
    }
}
