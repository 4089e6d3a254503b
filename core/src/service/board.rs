use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::model::stats::{KanbanBoard, TaskAnalytics, UrgencyLevel};
use crate::model::task::{Priority, Task, TaskStatus};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const UPCOMING_DAYS: i64 = 7;

/// Whole days left until the deadline, rounded up. Negative once overdue.
pub fn days_until_deadline(task: &Task, now: DateTime<Utc>) -> i64 {
    let secs = (task.deadline - now).num_seconds();
    // ceil for signed division
    secs.div_euclid(SECONDS_PER_DAY) + i64::from(secs.rem_euclid(SECONDS_PER_DAY) != 0)
}

pub fn urgency_level(task: &Task, now: DateTime<Utc>) -> UrgencyLevel {
    match days_until_deadline(task, now) {
        d if d < 0 => UrgencyLevel::Overdue,
        d if d <= 1 => UrgencyLevel::Urgent,
        d if d <= 3 => UrgencyLevel::Soon,
        _ => UrgencyLevel::Normal,
    }
}

/// Narrows a task listing. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub subject_id: Option<Uuid>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self.subject_id.map_or(true, |id| task.subject_id == Some(id))
    }
}

/// Tasks matching `filter`, soonest deadline first.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    let mut matched: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    matched.sort_by_key(|t| t.deadline);
    matched
}

pub fn kanban(tasks: &[Task]) -> KanbanBoard {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|t| t.deadline);

    let mut board = KanbanBoard::default();
    for task in sorted {
        match task.status {
            TaskStatus::Todo => board.todo.push(task),
            TaskStatus::InProgress => board.in_progress.push(task),
            TaskStatus::Done => board.done.push(task),
        }
    }
    board
}

/// Unfinished tasks due within the next week, soonest first.
pub fn upcoming(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let horizon = now + Duration::days(UPCOMING_DAYS);
    let mut due: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.is_done() && t.deadline >= now && t.deadline <= horizon)
        .cloned()
        .collect();
    due.sort_by_key(|t| t.deadline);
    due
}

pub fn analytics(tasks: &[Task], now: DateTime<Utc>) -> TaskAnalytics {
    let mut stats = TaskAnalytics {
        total: tasks.len(),
        ..Default::default()
    };

    for task in tasks {
        *stats.by_priority.entry(task.priority).or_default() += 1;
        *stats.by_type.entry(task.task_type).or_default() += 1;

        if task.is_done() {
            stats.completed += 1;
            continue;
        }
        stats.pending += 1;
        match urgency_level(task, now) {
            UrgencyLevel::Overdue => stats.overdue += 1,
            UrgencyLevel::Urgent => stats.urgent += 1,
            _ => {}
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskType;

    fn task(title: &str, deadline: DateTime<Utc>, status: TaskStatus) -> Task {
        let mut t = Task::new(title.to_string(), deadline);
        t.status = status;
        t
    }

    #[test]
    fn test_days_until_deadline_rounds_up() {
        let now = Utc::now();
        assert_eq!(days_until_deadline(&task("a", now + Duration::hours(1), TaskStatus::Todo), now), 1);
        assert_eq!(days_until_deadline(&task("a", now + Duration::days(2), TaskStatus::Todo), now), 2);
        assert_eq!(days_until_deadline(&task("a", now, TaskStatus::Todo), now), 0);
        assert_eq!(days_until_deadline(&task("a", now - Duration::hours(1), TaskStatus::Todo), now), 0);
        assert_eq!(days_until_deadline(&task("a", now - Duration::hours(25), TaskStatus::Todo), now), -1);
    }

    #[test]
    fn test_urgency_levels() {
        let now = Utc::now();
        let level = |d: Duration| urgency_level(&task("a", now + d, TaskStatus::Todo), now);
        assert_eq!(level(Duration::days(-2)), UrgencyLevel::Overdue);
        assert_eq!(level(Duration::hours(20)), UrgencyLevel::Urgent);
        assert_eq!(level(Duration::days(3)), UrgencyLevel::Soon);
        assert_eq!(level(Duration::days(5)), UrgencyLevel::Normal);
    }

    #[test]
    fn test_kanban_columns_sorted_by_deadline() {
        let now = Utc::now();
        let tasks = vec![
            task("late todo", now + Duration::days(5), TaskStatus::Todo),
            task("doing", now + Duration::days(1), TaskStatus::InProgress),
            task("early todo", now + Duration::days(1), TaskStatus::Todo),
            task("finished", now - Duration::days(1), TaskStatus::Done),
        ];
        let board = kanban(&tasks);
        let titles = |col: &[Task]| col.iter().map(|t| t.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&board.todo), vec!["early todo", "late todo"]);
        assert_eq!(titles(&board.in_progress), vec!["doing"]);
        assert_eq!(titles(&board.done), vec!["finished"]);
    }

    #[test]
    fn test_filter_tasks() {
        let now = Utc::now();
        let subject = Uuid::new_v4();
        let mut lab = task("lab", now + Duration::days(4), TaskStatus::Todo);
        lab.subject_id = Some(subject);
        lab.priority = Priority::High;
        let mut quiz = task("quiz", now + Duration::days(1), TaskStatus::Todo);
        quiz.subject_id = Some(subject);
        let tasks = vec![
            lab,
            task("essay", now + Duration::days(2), TaskStatus::InProgress),
            quiz,
        ];
        let titles = |filter: TaskFilter| {
            filter_tasks(&tasks, &filter).into_iter().map(|t| t.title).collect::<Vec<_>>()
        };

        assert_eq!(titles(TaskFilter::default()), vec!["quiz", "essay", "lab"]);
        assert_eq!(
            titles(TaskFilter { status: Some(TaskStatus::Todo), ..Default::default() }),
            vec!["quiz", "lab"]
        );
        assert_eq!(
            titles(TaskFilter { subject_id: Some(subject), priority: Some(Priority::High), ..Default::default() }),
            vec!["lab"]
        );
        assert!(titles(TaskFilter { status: Some(TaskStatus::Done), ..Default::default() }).is_empty());
    }

    #[test]
    fn test_upcoming_window() {
        let now = Utc::now();
        let tasks = vec![
            task("next week+", now + Duration::days(8), TaskStatus::Todo),
            task("in 3 days", now + Duration::days(3), TaskStatus::Todo),
            task("tomorrow", now + Duration::days(1), TaskStatus::InProgress),
            task("done", now + Duration::days(2), TaskStatus::Done),
            task("overdue", now - Duration::days(1), TaskStatus::Todo),
        ];
        let titles: Vec<String> = upcoming(&tasks, now).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["tomorrow", "in 3 days"]);
    }

    #[test]
    fn test_analytics_counts() {
        let now = Utc::now();
        let mut exam = task("exam", now + Duration::hours(10), TaskStatus::Todo);
        exam.task_type = TaskType::Exam;
        exam.priority = Priority::High;
        let tasks = vec![
            exam,
            task("overdue", now - Duration::days(3), TaskStatus::InProgress),
            task("overdue but done", now - Duration::days(3), TaskStatus::Done),
            task("later", now + Duration::days(10), TaskStatus::Todo),
        ];

        let stats = analytics(&tasks, now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.by_priority.get(&Priority::High), Some(&1));
        assert_eq!(stats.by_priority.get(&Priority::Medium), Some(&3));
        assert_eq!(stats.by_type.get(&TaskType::Exam), Some(&1));
        assert_eq!(stats.by_type.get(&TaskType::Assignment), Some(&3));
    }
}
