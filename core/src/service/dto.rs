use serde::{Serialize, Deserialize};
use chrono::Weekday;

use crate::model::stats::{AttendanceStat, UrgencyLevel};
use crate::model::subject::Subject;
use crate::model::task::Task;
use crate::model::timetable::ScheduleEntry;

/// A subject together with its derived attendance figures.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubjectDto {
    #[serde(flatten)]
    pub subject: Subject,
    pub stat: AttendanceStat,
    pub insight: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TodayClasses {
    pub day: Weekday,
    pub all_classes: Vec<ScheduleEntry>,
    pub current_class: Option<ScheduleEntry>,
    pub next_class: Option<ScheduleEntry>,
    pub total_classes: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskDto {
    #[serde(flatten)]
    pub task: Task,
    pub days_until_deadline: i64,
    pub urgency: UrgencyLevel,
}
