use anyhow::Result;
use chrono::Weekday;
use tracing::info;
use uuid::Uuid;

use crate::model::stats::{DaySchedule, FreeSlot};
use crate::model::timetable::ScheduleEntry;
use crate::repository::Repository;
use crate::service::dto::TodayClasses;
use crate::service::schedule::{self, DayWindow};

pub struct TimetableService<R: Repository<ScheduleEntry>> {
    repo: R,
    window: DayWindow,
    min_free_slot_minutes: u32,
}

impl<R: Repository<ScheduleEntry>> TimetableService<R> {
    pub fn new(repo: R, window: DayWindow, min_free_slot_minutes: u32) -> Self {
        Self {
            repo,
            window,
            min_free_slot_minutes,
        }
    }

    /// Stores the entry unless it overlaps an active class on the same day.
    pub fn add_entry(&self, entry: ScheduleEntry) -> Result<ScheduleEntry> {
        self.repo.create(entry)
    }

    /// Saves an edited entry; the overlap check runs against every other
    /// stored entry.
    pub fn update_entry(&self, entry: ScheduleEntry) -> Result<ScheduleEntry> {
        self.repo.update(&entry)?;
        info!(id = %entry.id, day = ?entry.day, start = %entry.start_time, "timetable entry updated");
        Ok(entry)
    }

    pub fn find(&self, id_prefix: &str) -> Result<ScheduleEntry> {
        self.repo.find_by_prefix(id_prefix)
    }

    pub fn remove_entry(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)
    }

    pub fn week(&self) -> Result<Vec<DaySchedule>> {
        Ok(schedule::group_by_day(&self.repo.list()?)?)
    }

    pub fn today(&self, day: Weekday, now_minutes: u32) -> Result<TodayClasses> {
        let all_classes = self.active_on(day)?;
        let window = schedule::current_and_next(&all_classes, now_minutes)?;
        Ok(TodayClasses {
            day,
            total_classes: all_classes.len(),
            all_classes,
            current_class: window.current,
            next_class: window.next,
        })
    }

    pub fn next_class(&self, day: Weekday, now_minutes: u32) -> Result<Option<ScheduleEntry>> {
        Ok(schedule::next_class_across_week(&self.repo.list()?, day, now_minutes)?)
    }

    pub fn free_slots(&self, day: Weekday) -> Result<Vec<FreeSlot>> {
        let entries = self.active_on(day)?;
        Ok(schedule::free_slots_in(&entries, self.window, self.min_free_slot_minutes)?)
    }

    fn active_on(&self, day: Weekday) -> Result<Vec<ScheduleEntry>> {
        let entries = self.repo.list()?;
        Ok(schedule::group_by_day(&entries)?
            .into_iter()
            .find(|d| d.day == day)
            .map(|d| d.entries)
            .unwrap_or_default())
    }
}
