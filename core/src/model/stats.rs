use serde::{Deserialize, Serialize};
use chrono::Weekday;
use std::collections::HashMap;
use uuid::Uuid;

use crate::model::task::{Priority, Task, TaskType};
use crate::model::timetable::ScheduleEntry;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Safe,
    Warning,
    Critical,
}

/// Derived attendance figures. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceStat {
    pub percentage: u8,
    pub status: AttendanceStatus,
    /// Classes to attend when below target, or classes that may still be
    /// missed when `meets_target` is set.
    pub classes_needed: u64,
    pub meets_target: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubjectStat {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub stat: AttendanceStat,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AttendanceSummary {
    pub total_subjects: usize,
    pub safe_subjects: usize,
    pub warning_subjects: usize,
    pub critical_subjects: usize,
    pub average_attendance: u8,
    pub subjects: Vec<SubjectStat>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FreeSlot {
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ClassWindow {
    pub current: Option<ScheduleEntry>,
    pub next: Option<ScheduleEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub day: Weekday,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Overdue,
    Urgent,
    Soon,
    Normal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct KanbanBoard {
    pub todo: Vec<Task>,
    #[serde(rename = "in-progress")]
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TaskAnalytics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub urgent: usize,
    pub by_priority: HashMap<Priority, usize>,
    pub by_type: HashMap<TaskType, usize>,
}
