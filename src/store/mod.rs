//! Keyed record storage.
//!
//! Every entity kind implements [`Record`]; a [`Repository`] stores one kind.
//! [`Store`] bundles one repository per kind behind trait objects so a
//! persistent backend can replace [`MemoryRepository`] without touching the
//! conflict model or the validators.

pub mod fixtures;
pub mod memory;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use validator::Validate;

use crate::domain::{
    Course, EntityId, Faculty, Room, Scenario, Student, TimetableEntry, User,
};
use crate::error::DomainError;

pub use memory::MemoryRepository;

/// Value of a field that must be unique across one entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueKey<'a> {
    pub field: &'static str,
    pub value: &'a str,
}

impl<'a> UniqueKey<'a> {
    pub fn new(field: &'static str, value: &'a str) -> Self {
        Self { field, value }
    }
}

/// A storable entity kind
pub trait Record: Clone + Send + Sync + 'static {
    /// Input shape for `create`
    type New: Validate + Send;
    /// Partial update merged by `update`
    type Patch: Send;

    const KIND: &'static str;

    fn id(&self) -> &EntityId;
    fn created_at(&self) -> DateTime<Utc>;
    fn build(id: EntityId, created_at: DateTime<Utc>, new: Self::New) -> Self;
    /// Merge a patch. Identifier and creation timestamp are not patchable.
    fn apply(&mut self, patch: Self::Patch);

    fn unique_key(&self) -> Option<UniqueKey<'_>> {
        None
    }

    /// Whole-record invariants, checked before every write
    fn check(&self) -> Result<(), DomainError> {
        Ok(())
    }

    /// A flag that at most one record of this kind may hold. Writing a record
    /// that holds it releases it on every other record in the same step.
    fn holds_exclusive_flag(&self) -> bool {
        false
    }

    fn release_exclusive_flag(&mut self) {}
}

/// CRUD over one entity kind.
///
/// Each call is atomic for readers: a failed write leaves the repository
/// exactly as it was.
pub trait Repository<R: Record>: Send + Sync {
    /// All records in insertion order
    fn list_all(&self) -> Vec<R>;

    fn get(&self, id: &EntityId) -> Option<R>;

    fn create(&self, new: R::New) -> Result<R, DomainError>;

    fn update(&self, id: &EntityId, patch: R::Patch) -> Result<R, DomainError>;

    /// `true` if a record existed and was removed
    fn delete(&self, id: &EntityId) -> bool;

    fn count(&self) -> usize {
        self.list_all().len()
    }

    fn find(&self, predicate: &dyn Fn(&R) -> bool) -> Vec<R> {
        self.list_all().into_iter().filter(|r| predicate(r)).collect()
    }
}

/// One repository per entity kind. Constructed explicitly and passed to
/// whatever serves requests.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Repository<User>>,
    pub students: Arc<dyn Repository<Student>>,
    pub faculty: Arc<dyn Repository<Faculty>>,
    pub courses: Arc<dyn Repository<Course>>,
    pub rooms: Arc<dyn Repository<Room>>,
    pub scenarios: Arc<dyn Repository<Scenario>>,
    pub entries: Arc<dyn Repository<TimetableEntry>>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryRepository::<User>::new()),
            students: Arc::new(MemoryRepository::<Student>::new()),
            faculty: Arc::new(MemoryRepository::<Faculty>::new()),
            courses: Arc::new(MemoryRepository::<Course>::new()),
            rooms: Arc::new(MemoryRepository::<Room>::new()),
            scenarios: Arc::new(MemoryRepository::<Scenario>::new()),
            entries: Arc::new(MemoryRepository::<TimetableEntry>::new()),
        }
    }

    /// Entries filtered by scenario; `None` lists every entry
    pub fn list_entries(&self, scenario_id: Option<&EntityId>) -> Vec<TimetableEntry> {
        match scenario_id {
            Some(id) => self.entries.find(&|e: &TimetableEntry| e.scenario_id.as_ref() == Some(id)),
            None => self.entries.list_all(),
        }
    }

    /// Entries sharing exactly this scope; `None` selects unscoped entries
    pub fn scenario_entries(&self, scenario_id: Option<&EntityId>) -> Vec<TimetableEntry> {
        self.entries.find(&|e: &TimetableEntry| e.in_scope(scenario_id))
    }

    pub fn active_scenario(&self) -> Option<Scenario> {
        self.scenarios.list_all().into_iter().find(|s| s.is_active)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::in_memory()
    }
}
