pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Config;
pub use error::EngineError;
pub use model::stats::{AttendanceStat, AttendanceStatus, FreeSlot};
pub use model::subject::{AttendanceRecord, Subject};
pub use model::task::{Priority, Task, TaskStatus, TaskType};
pub use model::timetable::{ClassType, ScheduleEntry};
pub use repository::{FileRepository, Repository};
pub use input::{parse_args, expand_key, ParsedInput};
pub use time::{parse_day, parse_human_date, time_to_minutes};
pub use service::attendance::compute_stat;
pub use service::schedule::{current_and_next, find_conflict, free_slots, next_class_across_week};
