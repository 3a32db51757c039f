pub mod course;
pub mod faculty;
pub mod room;
pub mod scenario;
pub mod student;
pub mod timetable;
pub mod types;
pub mod user;

pub use course::*;
pub use faculty::*;
pub use room::*;
pub use scenario::*;
pub use student::*;
pub use timetable::*;
pub use types::*;
pub use user::*;
