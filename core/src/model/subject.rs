use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{EngineError, Result};

const DEFAULT_COLOR: &str = "#3B82F6";

/// Aggregate attendance counters. Individual marks are not kept.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub total_classes: u32,
    pub attended_classes: u32,
}

impl AttendanceRecord {
    pub fn new(total_classes: u32, attended_classes: u32) -> Option<Self> {
        (attended_classes <= total_classes).then_some(Self {
            total_classes,
            attended_classes,
        })
    }

    /// Counts one more class. Fails without changing anything once the
    /// total can no longer grow.
    pub fn mark(&mut self, present: bool) -> Result<()> {
        let total_classes = self
            .total_classes
            .checked_add(1)
            .ok_or_else(|| EngineError::InvalidInput("total classes is at its maximum".to_string()))?;
        self.total_classes = total_classes;
        if present {
            // attended <= total held before, so this cannot overflow
            self.attended_classes += 1;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub professor: Option<String>,
    pub color: String,
    #[serde(flatten)]
    pub attendance: AttendanceRecord,
    pub created_at: DateTime<Utc>,
}

impl Subject {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            code: None,
            professor: None,
            color: DEFAULT_COLOR.to_string(),
            attendance: AttendanceRecord::default(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_attendance() {
        let mut record = AttendanceRecord::default();
        record.mark(true).unwrap();
        record.mark(false).unwrap();
        record.mark(true).unwrap();
        assert_eq!(record, AttendanceRecord { total_classes: 3, attended_classes: 2 });
    }

    #[test]
    fn test_mark_at_maximum_leaves_record_unchanged() {
        let mut record = AttendanceRecord::new(u32::MAX, u32::MAX - 1).unwrap();
        assert!(matches!(record.mark(true), Err(EngineError::InvalidInput(_))));
        assert_eq!(record.total_classes, u32::MAX);
        assert_eq!(record.attended_classes, u32::MAX - 1);
    }

    #[test]
    fn test_record_rejects_attended_over_total() {
        assert!(AttendanceRecord::new(3, 4).is_none());
        assert!(AttendanceRecord::new(4, 4).is_some());
    }

    #[test]
    fn test_subject_serializes_counters_flat() {
        let mut subject = Subject::new("Physics".to_string());
        subject.attendance.mark(true).unwrap();
        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(json["total_classes"], 1);
        assert_eq!(json["attended_classes"], 1);
    }
}
