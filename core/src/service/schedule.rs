//! Timetable interval logic over `[start, end)` minute ranges.

use chrono::Weekday;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::model::stats::{ClassWindow, DaySchedule, FreeSlot};
use crate::model::timetable::ScheduleEntry;
use crate::time::{day_name, minutes_to_time, time_to_minutes, MINUTES_PER_DAY};

pub const DEFAULT_DAY_START: &str = "08:00";
pub const DEFAULT_DAY_END: &str = "20:00";
pub const MIN_FREE_SLOT_MINUTES: u32 = 30;

pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Bounds within which free time is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: u32,
    end: u32,
}

impl DayWindow {
    pub fn new(start: &str, end: &str) -> Result<Self> {
        let start_min = time_to_minutes(start)?;
        let end_min = time_to_minutes(end)?;
        if start_min >= end_min {
            return Err(EngineError::InvalidInput(format!(
                "day window start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self { start: start_min, end: end_min })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }
}

impl Default for DayWindow {
    fn default() -> Self {
        Self { start: 8 * 60, end: 20 * 60 }
    }
}

/// Returns the first active entry on the candidate's day whose interval
/// overlaps the candidate's. Entries sharing the candidate's id are skipped.
pub fn find_conflict<'a>(existing: &'a [ScheduleEntry], candidate: &ScheduleEntry) -> Result<Option<&'a ScheduleEntry>> {
    let (start, end) = candidate.interval()?;

    for entry in existing {
        if entry.day != candidate.day || !entry.is_active || entry.id == candidate.id {
            continue;
        }
        let (other_start, other_end) = entry.interval()?;
        if start < other_end && other_start < end {
            return Ok(Some(entry));
        }
    }
    Ok(None)
}

pub fn ensure_no_conflict(existing: &[ScheduleEntry], candidate: &ScheduleEntry) -> Result<()> {
    if let Some(conflict) = find_conflict(existing, candidate)? {
        warn!(
            day = day_name(candidate.day),
            candidate = %format!("{}-{}", candidate.start_time, candidate.end_time),
            existing = %format!("{}-{}", conflict.start_time, conflict.end_time),
            "rejecting overlapping timetable entry"
        );
        return Err(EngineError::Conflict {
            day: day_name(candidate.day).to_string(),
            start_time: candidate.start_time.clone(),
            end_time: candidate.end_time.clone(),
        });
    }
    Ok(())
}

/// `current` is the class in progress at `now_minutes`, `next` the first
/// class starting strictly after it.
pub fn current_and_next(entries_for_today: &[ScheduleEntry], now_minutes: u32) -> Result<ClassWindow> {
    validate_now(now_minutes)?;
    let sorted = active_sorted(entries_for_today)?;

    let current = sorted
        .iter()
        .find(|(start, end, _)| *start <= now_minutes && now_minutes < *end)
        .map(|(_, _, entry)| (*entry).clone());
    let next = sorted
        .iter()
        .find(|(start, _, _)| *start > now_minutes)
        .map(|(_, _, entry)| (*entry).clone());

    Ok(ClassWindow { current, next })
}

/// Next class after `now_minutes` on `today`, otherwise the first class of the
/// nearest following day. Seven days are scanned, so the last candidate is
/// `today` one week later.
pub fn next_class_across_week(
    all_entries: &[ScheduleEntry],
    today: Weekday,
    now_minutes: u32,
) -> Result<Option<ScheduleEntry>> {
    let todays: Vec<ScheduleEntry> = all_entries.iter().filter(|e| e.day == today).cloned().collect();
    if let Some(next) = current_and_next(&todays, now_minutes)?.next {
        return Ok(Some(next));
    }

    let mut day = today;
    for _ in 1..=7 {
        day = day.succ();
        let days_entries: Vec<ScheduleEntry> = all_entries.iter().filter(|e| e.day == day).cloned().collect();
        if let Some((_, _, first)) = active_sorted(&days_entries)?.first() {
            debug!(day = day_name(day), start = %first.start_time, "next class found on a later day");
            return Ok(Some((*first).clone()));
        }
    }
    Ok(None)
}

/// Free slots of at least 30 minutes between 08:00 and 20:00.
pub fn free_slots(entries_for_day: &[ScheduleEntry]) -> Result<Vec<FreeSlot>> {
    free_slots_in(entries_for_day, DayWindow::default(), MIN_FREE_SLOT_MINUTES)
}

pub fn free_slots_in(entries_for_day: &[ScheduleEntry], window: DayWindow, min_minutes: u32) -> Result<Vec<FreeSlot>> {
    let sorted = active_sorted(entries_for_day)?;
    let mut gaps = Vec::new();
    let mut cursor = window.start;

    for (start, end, _) in sorted {
        if cursor >= window.end {
            break;
        }
        if start > cursor {
            gaps.push((cursor, start.min(window.end)));
        }
        cursor = cursor.max(end);
    }
    if cursor < window.end {
        gaps.push((cursor, window.end));
    }

    Ok(gaps
        .into_iter()
        .filter(|(start, end)| end - start >= min_minutes)
        .map(|(start, end)| FreeSlot {
            start_time: minutes_to_time(start),
            end_time: minutes_to_time(end),
            duration_minutes: end - start,
        })
        .collect())
}

/// Active entries grouped Monday to Sunday, each day sorted by start time.
pub fn group_by_day(entries: &[ScheduleEntry]) -> Result<Vec<DaySchedule>> {
    let mut week = Vec::new();
    for day in WEEK {
        let days_entries: Vec<ScheduleEntry> = entries.iter().filter(|e| e.day == day).cloned().collect();
        let sorted: Vec<ScheduleEntry> = active_sorted(&days_entries)?
            .into_iter()
            .map(|(_, _, entry)| entry.clone())
            .collect();
        if !sorted.is_empty() {
            week.push(DaySchedule { day, entries: sorted });
        }
    }
    Ok(week)
}

fn active_sorted(entries: &[ScheduleEntry]) -> Result<Vec<(u32, u32, &ScheduleEntry)>> {
    let mut sorted = entries
        .iter()
        .filter(|e| e.is_active)
        .map(|e| e.interval().map(|(start, end)| (start, end, e)))
        .collect::<Result<Vec<_>>>()?;
    sorted.sort_by_key(|(start, _, _)| *start);
    Ok(sorted)
}

fn validate_now(now_minutes: u32) -> Result<()> {
    if now_minutes >= MINUTES_PER_DAY {
        return Err(EngineError::InvalidInput(format!(
            "minute of day must be below {}, got {}",
            MINUTES_PER_DAY, now_minutes
        )));
    }
    Ok(())
}
