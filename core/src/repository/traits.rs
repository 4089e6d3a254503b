use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::model::subject::Subject;
use crate::model::task::Task;
use crate::model::timetable::ScheduleEntry;
use crate::service::schedule::ensure_no_conflict;

/// A stored record type.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KIND: &'static str;
    const FILE_NAME: &'static str;

    fn id(&self) -> Uuid;

    /// Runs against the stored records right before an insert or update is
    /// written.
    fn check_write(&self, _stored: &[Self]) -> Result<()> {
        Ok(())
    }
}

pub trait Repository<T: Record> {
    fn create(&self, record: T) -> Result<T>;
    fn get(&self, id: &Uuid) -> Result<T>;
    fn list(&self) -> Result<Vec<T>>;
    fn update(&self, record: &T) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;

    /// Resolves an abbreviated id such as the 8-character form shown in listings.
    fn find_by_prefix(&self, prefix: &str) -> Result<T> {
        let prefix = prefix.to_lowercase();
        let mut matches: Vec<T> = self
            .list()?
            .into_iter()
            .filter(|r| r.id().to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(EngineError::NotFound(format!("{} '{}'", T::KIND, prefix)).into()),
            n => Err(anyhow!("Ambiguous id '{}' matches {} {}s", prefix, n, T::KIND)),
        }
    }
}

impl Record for Subject {
    const KIND: &'static str = "subject";
    const FILE_NAME: &'static str = "subjects.json";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Task {
    const KIND: &'static str = "task";
    const FILE_NAME: &'static str = "tasks.json";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for ScheduleEntry {
    const KIND: &'static str = "timetable entry";
    const FILE_NAME: &'static str = "timetable.json";

    fn id(&self) -> Uuid {
        self.id
    }

    // Same-day active entries must not overlap.
    fn check_write(&self, stored: &[Self]) -> Result<()> {
        self.validate()?;
        if !self.is_active {
            return Ok(());
        }
        ensure_no_conflict(stored, self)?;
        Ok(())
    }
}
