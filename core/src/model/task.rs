use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Assignment,
    Exam,
    Project,
    Quiz,
    Other,
}

impl std::str::FromStr for Priority {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "l" | "low" => Ok(Priority::Low),
            "m" | "med" | "medium" => Ok(Priority::Medium),
            "h" | "high" => Ok(Priority::High),
            _ => Err(EngineError::InvalidInput(format!("unknown priority '{}'", s))),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" | "doing" | "wip" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(EngineError::InvalidInput(format!("unknown status '{}'", s))),
        }
    }
}

impl std::str::FromStr for TaskType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assignment" => Ok(TaskType::Assignment),
            "exam" => Ok(TaskType::Exam),
            "project" => Ok(TaskType::Project),
            "quiz" => Ok(TaskType::Quiz),
            "other" => Ok(TaskType::Other),
            _ => Err(EngineError::InvalidInput(format!("unknown task type '{}'", s))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subject_id: Option<Uuid>,
    pub deadline: DateTime<Utc>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub task_type: TaskType,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: String, deadline: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            subject_id: None,
            deadline,
            priority: Priority::default(),
            status: TaskStatus::default(),
            task_type: TaskType::default(),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Moves the card to another column of the board.
    pub fn move_to(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        if status == TaskStatus::Done && self.status != TaskStatus::Done {
            self.completed_at = Some(now);
        } else if status != TaskStatus::Done {
            self.completed_at = None;
        }
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_move_to_done_and_back() {
        let now = Utc::now();
        let mut task = Task::new("Lab report".to_string(), now + Duration::days(2));

        task.move_to(TaskStatus::InProgress, now);
        assert_eq!(task.completed_at, None);

        task.move_to(TaskStatus::Done, now);
        assert_eq!(task.completed_at, Some(now));
        assert!(task.is_done());

        // re-marking done keeps the first completion time
        task.move_to(TaskStatus::Done, now + Duration::hours(1));
        assert_eq!(task.completed_at, Some(now));

        task.move_to(TaskStatus::Todo, now);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_status_serde_is_kebab() {
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), "in-progress");
        assert_eq!("wip".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("H".parse::<Priority>().unwrap(), Priority::High);
    }
}
