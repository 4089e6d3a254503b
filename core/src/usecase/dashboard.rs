use anyhow::Result;
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::stats::{AttendanceSummary, FreeSlot};
use crate::model::subject::Subject;
use crate::model::task::Task;
use crate::model::timetable::ScheduleEntry;
use crate::repository::Repository;
use crate::service::dto::{TaskDto, TodayClasses};
use crate::service::subject_service::SubjectService;
use crate::service::task_service::TaskService;
use crate::service::timetable_service::TimetableService;

/// Everything the home screen shows for one owner at one instant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub today: TodayClasses,
    pub next_class: Option<ScheduleEntry>,
    pub free_slots: Vec<FreeSlot>,
    pub attendance: AttendanceSummary,
    pub upcoming_tasks: Vec<TaskDto>,
}

pub struct DashboardUseCase<'a, S, E, T>
where
    S: Repository<Subject>,
    E: Repository<ScheduleEntry>,
    T: Repository<Task>,
{
    subjects: &'a SubjectService<S>,
    timetable: &'a TimetableService<E>,
    tasks: &'a TaskService<T>,
}

impl<'a, S, E, T> DashboardUseCase<'a, S, E, T>
where
    S: Repository<Subject>,
    E: Repository<ScheduleEntry>,
    T: Repository<Task>,
{
    pub fn new(
        subjects: &'a SubjectService<S>,
        timetable: &'a TimetableService<E>,
        tasks: &'a TaskService<T>,
    ) -> Self {
        Self {
            subjects,
            timetable,
            tasks,
        }
    }

    pub fn build(&self, day: Weekday, now_minutes: u32, now: DateTime<Utc>) -> Result<Dashboard> {
        Ok(Dashboard {
            today: self.timetable.today(day, now_minutes)?,
            next_class: self.timetable.next_class(day, now_minutes)?,
            free_slots: self.timetable.free_slots(day)?,
            attendance: self.subjects.attendance_summary()?,
            upcoming_tasks: self.tasks.upcoming(now)?,
        })
    }
}
