use std::collections::HashMap;

use studydash_core::model::stats::{AttendanceSummary, DaySchedule, FreeSlot, KanbanBoard, TaskAnalytics};
use studydash_core::service::dto::{SubjectDto, TaskDto, TodayClasses};
use studydash_core::time::day_name;
use studydash_core::{ScheduleEntry, Subject, Task};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use uuid::Uuid;

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Subject")]
    name: String,
    #[tabled(rename = "Attended")]
    attended: String,
    #[tabled(rename = "%")]
    percentage: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Insight")]
    insight: String,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Room")]
    room: String,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Type")]
    kind: String,
}

/// Subject names keyed by id, for timetable listings.
pub type SubjectNames = HashMap<Uuid, String>;

pub fn subject_names(subjects: &[Subject]) -> SubjectNames {
    subjects.iter().map(|s| (s.id, s.name.clone())).collect()
}

pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

fn subject_row(dto: &SubjectDto) -> SubjectRow {
    let record = dto.subject.attendance;
    SubjectRow {
        id: short_id(&dto.subject.id),
        name: dto.subject.name.clone(),
        attended: format!("{}/{}", record.attended_classes, record.total_classes),
        percentage: format!("{}%", dto.stat.percentage),
        status: format!("{:?}", dto.stat.status).to_lowercase(),
        insight: dto.insight.clone(),
    }
}

pub fn subjects(dtos: &[SubjectDto]) {
    if dtos.is_empty() {
        println!("No subjects yet.");
        return;
    }
    print_table(dtos.iter().map(subject_row).collect());
}

pub fn subject(dto: &SubjectDto) {
    print_table(vec![subject_row(dto)]);
}

pub fn attendance(summary: &AttendanceSummary) {
    if summary.total_subjects == 0 {
        println!("No subjects yet.");
        return;
    }
    println!(
        "Average attendance: {}%  (safe {}, warning {}, critical {})",
        summary.average_attendance, summary.safe_subjects, summary.warning_subjects, summary.critical_subjects
    );
    let rows = summary
        .subjects
        .iter()
        .map(|s| SubjectRow {
            id: short_id(&s.id),
            name: s.name.clone(),
            attended: String::new(),
            percentage: format!("{}%", s.stat.percentage),
            status: format!("{:?}", s.stat.status).to_lowercase(),
            insight: studydash_core::service::attendance::insight(&s.stat),
        })
        .collect();
    print_table(rows);
}

fn entry_row(entry: &ScheduleEntry, names: &SubjectNames) -> EntryRow {
    EntryRow {
        id: short_id(&entry.id),
        day: day_name(entry.day).to_string(),
        time: format!("{}-{}", entry.start_time, entry.end_time),
        subject: names.get(&entry.subject_id).cloned().unwrap_or_else(|| "-".to_string()),
        kind: format!("{:?}", entry.kind).to_lowercase(),
        room: entry.room.clone().unwrap_or_else(|| "-".to_string()),
    }
}

pub fn entry(entry: &ScheduleEntry, names: &SubjectNames) {
    print_table(vec![entry_row(entry, names)]);
}

pub fn week(week: &[DaySchedule], names: &SubjectNames) {
    if week.is_empty() {
        println!("Timetable is empty.");
        return;
    }
    let rows = week
        .iter()
        .flat_map(|d| d.entries.iter())
        .map(|e| entry_row(e, names))
        .collect();
    print_table(rows);
}

pub fn today(today: &TodayClasses, names: &SubjectNames) {
    println!("{}: {} class(es)", day_name(today.day), today.total_classes);
    if let Some(current) = &today.current_class {
        println!("  Now:  {}", describe(current, names));
    }
    if let Some(next) = &today.next_class {
        println!("  Next: {}", describe(next, names));
    }
    if !today.all_classes.is_empty() {
        print_table(today.all_classes.iter().map(|e| entry_row(e, names)).collect());
    }
}

pub fn describe(entry: &ScheduleEntry, names: &SubjectNames) -> String {
    let subject = names.get(&entry.subject_id).map(String::as_str).unwrap_or("-");
    match &entry.room {
        Some(room) => format!("{} {} {}-{} ({})", subject, day_name(entry.day), entry.start_time, entry.end_time, room),
        None => format!("{} {} {}-{}", subject, day_name(entry.day), entry.start_time, entry.end_time),
    }
}

pub fn free_slots(slots: &[FreeSlot]) {
    if slots.is_empty() {
        println!("No free slots.");
        return;
    }
    for slot in slots {
        println!("  {}-{}  ({} min)", slot.start_time, slot.end_time, slot.duration_minutes);
    }
}

fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: short_id(&task.id),
        title: task.title.clone(),
        due: task.deadline.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string(),
        priority: format!("{:?}", task.priority).to_lowercase(),
        kind: format!("{:?}", task.task_type).to_lowercase(),
    }
}

pub fn task(dto: &TaskDto) {
    print_table(vec![task_row(&dto.task)]);
    println!("  {} day(s) left, {:?}", dto.days_until_deadline, dto.urgency);
}

pub fn tasks(dtos: &[TaskDto]) {
    if dtos.is_empty() {
        println!("Nothing due this week.");
        return;
    }
    print_table(dtos.iter().map(|d| task_row(&d.task)).collect());
}

pub fn board(board: &KanbanBoard) {
    for (title, column) in [("TODO", &board.todo), ("IN PROGRESS", &board.in_progress), ("DONE", &board.done)] {
        println!("\n\x1b[1;36m{}\x1b[0m ({})", title, column.len());
        if !column.is_empty() {
            print_table(column.iter().map(task_row).collect());
        }
    }
}

pub fn task_stats(stats: &TaskAnalytics) {
    println!("Total:     {}", stats.total);
    println!("Completed: {}", stats.completed);
    println!("Pending:   {}", stats.pending);
    println!("Overdue:   {}", stats.overdue);
    println!("Urgent:    {}", stats.urgent);

    let mut by_priority: Vec<String> = stats
        .by_priority
        .iter()
        .map(|(p, n)| format!("{:?}={}", p, n).to_lowercase())
        .collect();
    by_priority.sort();
    println!("Priority:  {}", by_priority.join(" "));

    let mut by_type: Vec<String> = stats
        .by_type
        .iter()
        .map(|(t, n)| format!("{:?}={}", t, n).to_lowercase())
        .collect();
    by_type.sort();
    println!("Type:      {}", by_type.join(" "));
}
