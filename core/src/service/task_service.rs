use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::model::stats::{KanbanBoard, TaskAnalytics};
use crate::model::task::{Task, TaskStatus};
use crate::repository::Repository;
use crate::service::board::{self, TaskFilter};
use crate::service::dto::TaskDto;

pub struct TaskService<R: Repository<Task>> {
    repo: R,
}

impl<R: Repository<Task>> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_task(&self, task: Task) -> Result<TaskDto> {
        let created = self.repo.create(task)?;
        Ok(to_dto(created, Utc::now()))
    }

    pub fn find(&self, id_prefix: &str) -> Result<Task> {
        self.repo.find_by_prefix(id_prefix)
    }

    pub fn list(&self, filter: &TaskFilter, now: DateTime<Utc>) -> Result<Vec<TaskDto>> {
        let tasks = self.repo.list()?;
        Ok(board::filter_tasks(&tasks, filter)
            .into_iter()
            .map(|t| to_dto(t, now))
            .collect())
    }

    /// Saves an edited task. A status change goes through `Task::move_to` so
    /// the completion time stays consistent with the column.
    pub fn update_task(&self, mut task: Task) -> Result<TaskDto> {
        let now = Utc::now();
        let stored = self.repo.get(&task.id)?;
        let status = task.status;
        task.status = stored.status;
        task.completed_at = stored.completed_at;
        task.created_at = stored.created_at;
        task.move_to(status, now);
        self.repo.update(&task)?;
        info!(task = %task.title, "task updated");
        Ok(to_dto(task, now))
    }

    pub fn delete_task(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)
    }

    pub fn move_task(&self, id: &Uuid, status: TaskStatus) -> Result<TaskDto> {
        let now = Utc::now();
        let mut task = self.repo.get(id)?;
        task.move_to(status, now);
        self.repo.update(&task)?;
        info!(task = %task.title, ?status, "task moved");
        Ok(to_dto(task, now))
    }

    pub fn board(&self) -> Result<KanbanBoard> {
        Ok(board::kanban(&self.repo.list()?))
    }

    pub fn upcoming(&self, now: DateTime<Utc>) -> Result<Vec<TaskDto>> {
        let tasks = self.repo.list()?;
        Ok(board::upcoming(&tasks, now)
            .into_iter()
            .map(|t| to_dto(t, now))
            .collect())
    }

    pub fn analytics(&self, now: DateTime<Utc>) -> Result<TaskAnalytics> {
        Ok(board::analytics(&self.repo.list()?, now))
    }
}

pub fn to_dto(task: Task, now: DateTime<Utc>) -> TaskDto {
    TaskDto {
        days_until_deadline: board::days_until_deadline(&task, now),
        urgency: board::urgency_level(&task, now),
        task,
    }
}
