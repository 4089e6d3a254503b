use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use crate::error::EngineError;
use crate::model::stats::AttendanceSummary;
use crate::model::subject::Subject;
use crate::repository::Repository;
use crate::service::attendance::{insight, record_stat, summarize, validate_target};
use crate::service::dto::SubjectDto;

pub struct SubjectService<R: Repository<Subject>> {
    repo: R,
    target_percentage: f64,
}

impl<R: Repository<Subject>> SubjectService<R> {
    pub fn new(repo: R, target_percentage: f64) -> Result<Self> {
        validate_target(target_percentage)?;
        Ok(Self { repo, target_percentage })
    }

    pub fn create_subject(&self, subject: Subject) -> Result<SubjectDto> {
        validate_name(&subject.name)?;
        let created = self.repo.create(subject)?;
        self.to_dto(created)
    }

    pub fn list_subjects(&self) -> Result<Vec<SubjectDto>> {
        self.repo.list()?.into_iter().map(|s| self.to_dto(s)).collect()
    }

    pub fn find(&self, id_prefix: &str) -> Result<Subject> {
        self.repo.find_by_prefix(id_prefix)
    }

    /// Saves edited subject details. Attendance counters are only changed
    /// through `mark_attendance`.
    pub fn update_subject(&self, mut subject: Subject) -> Result<SubjectDto> {
        validate_name(&subject.name)?;
        let stored = self.repo.get(&subject.id)?;
        subject.attendance = stored.attendance;
        subject.created_at = stored.created_at;
        self.repo.update(&subject)?;
        info!(subject = %subject.name, "subject updated");
        self.to_dto(subject)
    }

    pub fn mark_attendance(&self, id: &Uuid, present: bool) -> Result<SubjectDto> {
        let mut subject = self.repo.get(id)?;
        subject.attendance.mark(present)?;
        self.repo.update(&subject)?;
        info!(subject = %subject.name, present, "attendance marked");
        self.to_dto(subject)
    }

    pub fn delete_subject(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)
    }

    pub fn attendance_summary(&self) -> Result<AttendanceSummary> {
        let subjects = self.repo.list()?;
        Ok(summarize(&subjects, self.target_percentage)?)
    }

    fn to_dto(&self, subject: Subject) -> Result<SubjectDto> {
        let stat = record_stat(&subject.attendance, self.target_percentage)?;
        Ok(SubjectDto {
            insight: insight(&stat),
            subject,
            stat,
        })
    }
}

fn validate_name(name: &str) -> Result<(), EngineError> {
    if name.trim().is_empty() {
        return Err(EngineError::InvalidInput("subject name must not be empty".to_string()));
    }
    Ok(())
}
