use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Weekday};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::time::time_to_minutes;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    #[default]
    Lecture,
    Lab,
    Tutorial,
    Seminar,
}

impl std::str::FromStr for ClassType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lecture" => Ok(ClassType::Lecture),
            "lab" => Ok(ClassType::Lab),
            "tutorial" => Ok(ClassType::Tutorial),
            "seminar" => Ok(ClassType::Seminar),
            _ => Err(EngineError::InvalidInput(format!("unknown class type '{}'", s))),
        }
    }
}

/// A weekly recurring class slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    #[serde(rename = "type")]
    pub kind: ClassType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ScheduleEntry {
    /// Fails unless both times are `HH:MM` and start is before end.
    pub fn new(subject_id: Uuid, day: Weekday, start_time: &str, end_time: &str) -> Result<Self> {
        let entry = Self {
            id: Uuid::new_v4(),
            subject_id,
            day,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            room: None,
            kind: ClassType::default(),
            is_active: true,
            created_at: Utc::now(),
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> Result<()> {
        let (start, end) = self.interval()?;
        if start >= end {
            return Err(EngineError::InvalidInput(format!(
                "start time {} must be before end time {}",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }

    pub fn with_room(mut self, room: Option<String>) -> Self {
        self.room = room;
        self
    }

    pub fn with_kind(mut self, kind: ClassType) -> Self {
        self.kind = kind;
        self
    }

    /// Half-open `[start, end)` in minutes since midnight.
    pub fn interval(&self) -> Result<(u32, u32)> {
        Ok((time_to_minutes(&self.start_time)?, time_to_minutes(&self.end_time)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_validates_times() {
        let subject = Uuid::new_v4();
        let entry = ScheduleEntry::new(subject, Weekday::Mon, "09:00", "10:30").unwrap();
        assert_eq!(entry.interval().unwrap(), (540, 630));
        assert!(entry.is_active);
        assert_eq!(entry.kind, ClassType::Lecture);

        assert!(matches!(
            ScheduleEntry::new(subject, Weekday::Mon, "10:00", "10:00"),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            ScheduleEntry::new(subject, Weekday::Mon, "9:00", "10:00"),
            Err(EngineError::MalformedTime(_))
        ));
    }

    #[test]
    fn test_class_type_parse_and_serde() {
        assert_eq!("Lab".parse::<ClassType>().unwrap(), ClassType::Lab);
        assert!("workshop".parse::<ClassType>().is_err());

        let entry = ScheduleEntry::new(Uuid::new_v4(), Weekday::Tue, "13:00", "15:00")
            .unwrap()
            .with_kind(ClassType::Seminar);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "seminar");
        assert_eq!(json["day"], "Tue");
    }
}
