use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::RwLock;
use validator::Validate;

use super::{Record, Repository};
use crate::domain::EntityId;
use crate::error::DomainError;

/// In-memory repository backed by an insertion-ordered map
pub struct MemoryRepository<R: Record> {
    records: RwLock<IndexMap<EntityId, R>>,
}

impl<R: Record> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(IndexMap::new()),
        }
    }

    fn ensure_unique(records: &IndexMap<EntityId, R>, candidate: &R) -> Result<(), DomainError> {
        let Some(key) = candidate.unique_key() else {
            return Ok(());
        };
        let taken = records.values().any(|existing| {
            existing.id() != candidate.id()
                && existing.unique_key().map(|k| k.value) == Some(key.value)
        });
        if taken {
            return Err(DomainError::DuplicateKey {
                entity: R::KIND,
                field: key.field,
                value: key.value.to_string(),
            });
        }
        Ok(())
    }

    fn release_others(records: &mut IndexMap<EntityId, R>, holder: &R) {
        if !holder.holds_exclusive_flag() {
            return;
        }
        for (id, other) in records.iter_mut() {
            if id != holder.id() {
                other.release_exclusive_flag();
            }
        }
    }
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Repository<R> for MemoryRepository<R> {
    fn list_all(&self) -> Vec<R> {
        self.records.read().values().cloned().collect()
    }

    fn get(&self, id: &EntityId) -> Option<R> {
        self.records.read().get(id).cloned()
    }

    fn create(&self, new: R::New) -> Result<R, DomainError> {
        new.validate()?;
        let record = R::build(EntityId::generate(), Utc::now(), new);
        record.check()?;

        let mut records = self.records.write();
        Self::ensure_unique(&records, &record)?;
        Self::release_others(&mut records, &record);
        records.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    fn update(&self, id: &EntityId, patch: R::Patch) -> Result<R, DomainError> {
        let mut records = self.records.write();
        let mut updated = records
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(R::KIND, id.as_str()))?;
        updated.apply(patch);
        updated.check()?;
        Self::ensure_unique(&records, &updated)?;
        Self::release_others(&mut records, &updated);
        records.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    fn delete(&self, id: &EntityId) -> bool {
        self.records.write().shift_remove(id).is_some()
    }

    fn count(&self) -> usize {
        self.records.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Course, CoursePatch, CourseType, Faculty, FacultyPatch, NewCourse, NewFaculty, NewRoom,
        NewScenario, NewStudent, NewUser, Program, Role, Room, RoomPatch, RoomType, Scenario,
        ScenarioPatch, Student, StudentPatch, User, UserPatch,
    };
    use std::fmt::Debug;

    fn course(code: &str) -> NewCourse {
        NewCourse::new(code, format!("Course {code}"), 3, CourseType::Major)
    }

    /// Creates two records, then checks that neither a second create nor an
    /// update of the other record can take the first one's key.
    fn assert_key_enforced<R>(
        field: &'static str,
        make: impl Fn(&str) -> R::New,
        take: impl FnOnce(&str) -> R::Patch,
    ) where
        R: Record + PartialEq + Debug,
    {
        let repo = MemoryRepository::<R>::new();
        repo.create(make("K1")).unwrap();
        let other = repo.create(make("K2")).unwrap();

        let err = repo.create(make("K1")).unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateKey {
                entity: R::KIND,
                field,
                value: "K1".to_string(),
            }
        );
        assert_eq!(repo.count(), 2);

        let err = repo.update(other.id(), take("K1")).unwrap_err();
        assert_eq!(err.kind(), "DuplicateKey");
        assert_eq!(repo.get(other.id()).unwrap(), other);
    }

    #[test]
    fn test_create_then_get_returns_input_plus_identity() {
        let repo = MemoryRepository::<Course>::new();
        let input = course("EDU101").with_max_enrollment(40);
        let created = repo.create(input.clone()).unwrap();

        let fetched = repo.get(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.code, input.code);
        assert_eq!(fetched.max_enrollment, Some(40));
        assert!(!fetched.id.is_empty());
    }

    #[test]
    fn test_duplicate_key_leaves_count_unchanged() {
        let repo = MemoryRepository::<Course>::new();
        repo.create(course("EDU101")).unwrap();
        let before = repo.count();

        let err = repo.create(course("EDU101")).unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateKey {
                entity: "course",
                field: "code",
                value: "EDU101".to_string(),
            }
        );
        assert_eq!(repo.count(), before);
    }

    #[test]
    fn test_update_cannot_steal_unique_key() {
        let repo = MemoryRepository::<Course>::new();
        repo.create(course("EDU101")).unwrap();
        let other = repo.create(course("PSY201")).unwrap();

        let patch = CoursePatch {
            code: Some("EDU101".to_string()),
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.update(&other.id, patch).unwrap_err().kind(), "DuplicateKey");
        // No partial write of the title either
        assert_eq!(repo.get(&other.id).unwrap(), other);
    }

    #[test]
    fn test_update_keeps_identity_and_position() {
        let repo = MemoryRepository::<Course>::new();
        let first = repo.create(course("A1")).unwrap();
        let second = repo.create(course("B1")).unwrap();

        let patch = CoursePatch {
            credits: Some(5),
            ..Default::default()
        };
        let updated = repo.update(&first.id, patch).unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.created_at, first.created_at);
        assert_eq!(updated.credits, 5);

        let ids: Vec<_> = repo.list_all().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_update_rejects_invalid_merge() {
        let repo = MemoryRepository::<Course>::new();
        let created = repo.create(course("A1")).unwrap();
        let patch = CoursePatch {
            credits: Some(0),
            ..Default::default()
        };
        assert_eq!(repo.update(&created.id, patch).unwrap_err().kind(), "InvalidInput");
        assert_eq!(repo.get(&created.id).unwrap().credits, 3);
    }

    #[test]
    fn test_unique_keys_per_entity() {
        assert_key_enforced::<Student>(
            "rollNo",
            |k| NewStudent::new(k, "Student", Program::BEd, 1),
            |k| StudentPatch {
                roll_no: Some(k.to_string()),
                ..Default::default()
            },
        );
        assert_key_enforced::<Faculty>(
            "employeeId",
            |k| NewFaculty::new(k, "Faculty", "Education"),
            |k| FacultyPatch {
                employee_id: Some(k.to_string()),
                ..Default::default()
            },
        );
        assert_key_enforced::<Room>(
            "name",
            |k| NewRoom::new(k, RoomType::Classroom, 30),
            |k| RoomPatch {
                name: Some(k.to_string()),
                ..Default::default()
            },
        );
        assert_key_enforced::<User>(
            "username",
            |k| NewUser {
                username: k.to_string(),
                role: Role::Admin,
                email: None,
            },
            |k| UserPatch {
                username: Some(k.to_string()),
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_update_applies_field_rules() {
        let repo = MemoryRepository::<Faculty>::new();
        let created = repo.create(NewFaculty::new("FAC001", "Dr. Wilson", "Education")).unwrap();

        let bad_email = FacultyPatch {
            email: Some(Some("not-an-email".to_string())),
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.update(&created.id, bad_email).unwrap_err().kind(), "InvalidInput");

        let blank_department = FacultyPatch {
            department: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.update(&created.id, blank_department).unwrap_err().kind(), "InvalidInput");
        assert_eq!(repo.get(&created.id).unwrap(), created);

        let users = MemoryRepository::<User>::new();
        let user = users
            .create(NewUser {
                username: "admin".to_string(),
                role: Role::Admin,
                email: None,
            })
            .unwrap();
        let patch = UserPatch {
            email: Some(Some("admin@".to_string())),
            ..Default::default()
        };
        assert_eq!(users.update(&user.id, patch).unwrap_err().kind(), "InvalidInput");
        assert_eq!(users.get(&user.id).unwrap().email, None);
    }

    #[test]
    fn test_update_clears_optional_fields() {
        let repo = MemoryRepository::<Student>::new();
        let mut new = NewStudent::new("S1", "Student", Program::BEd, 1).with_section("A");
        new.email = Some("s1@example.edu".to_string());
        let created = repo.create(new).unwrap();

        // Absent fields are kept
        let kept = repo.update(&created.id, StudentPatch::default()).unwrap();
        assert_eq!(kept.section.as_deref(), Some("A"));

        let patch = StudentPatch {
            email: Some(None),
            section: Some(None),
            ..Default::default()
        };
        let cleared = repo.update(&created.id, patch).unwrap();
        assert_eq!(cleared.email, None);
        assert_eq!(cleared.section, None);

        let rooms = MemoryRepository::<Room>::new();
        let mut new = NewRoom::new("R101", RoomType::Lab, 20);
        new.building = Some("Main".to_string());
        let room = rooms.create(new).unwrap();
        let patch: RoomPatch = serde_json::from_str(r#"{"building": null, "capacity": 25}"#).unwrap();
        let updated = rooms.update(&room.id, patch).unwrap();
        assert_eq!(updated.building, None);
        assert_eq!(updated.capacity, 25);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let repo = MemoryRepository::<Course>::new();
        let err = repo
            .update(&EntityId::from("missing"), CoursePatch::default())
            .unwrap_err();
        assert_eq!(err.kind(), "NotFound");
    }

    #[test]
    fn test_delete_semantics() {
        let repo = MemoryRepository::<Course>::new();
        let created = repo.create(course("A1")).unwrap();

        assert!(repo.delete(&created.id));
        assert!(repo.get(&created.id).is_none());
        assert!(!repo.delete(&created.id));
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_invalid_input_never_reaches_store() {
        let repo = MemoryRepository::<Course>::new();
        assert_eq!(repo.create(course("")).unwrap_err().kind(), "InvalidInput");
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_exclusive_flag_released_on_write() {
        let repo = MemoryRepository::<Scenario>::new();
        let s1 = repo.create(NewScenario::new("S1").active()).unwrap();
        let s2 = repo.create(NewScenario::new("S2").active()).unwrap();

        assert!(!repo.get(&s1.id).unwrap().is_active);
        assert!(repo.get(&s2.id).unwrap().is_active);

        repo.update(&s1.id, ScenarioPatch::activate()).unwrap();
        let active: Vec<_> = repo.list_all().into_iter().filter(|s| s.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, s1.id);
    }
}
