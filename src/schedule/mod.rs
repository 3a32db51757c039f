//! Slot & conflict model.
//!
//! Two timetable entries conflict when their weekly slots overlap and they
//! share a room, a faculty member or a student group. Each dimension is
//! checked on its own.

pub mod conflict;

pub use conflict::*;
