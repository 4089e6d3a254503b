//! Attendance arithmetic: percentage, status bucket and the number of classes
//! needed to reach (or still skippable above) a target percentage.
//!
//! Status buckets use fixed thresholds and do not follow the caller's target.

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::model::stats::{AttendanceStat, AttendanceStatus, AttendanceSummary, SubjectStat};
use crate::model::subject::{AttendanceRecord, Subject};

pub const SAFE_THRESHOLD: u8 = 75;
pub const WARNING_THRESHOLD: u8 = 65;
pub const DEFAULT_TARGET_PERCENTAGE: f64 = 75.0;

// Absorbs float noise in targets like 66.6 before ceil/floor.
const EPSILON: f64 = 1e-9;

pub fn compute_stat(total_classes: i64, attended_classes: i64, target_percentage: f64) -> Result<AttendanceStat> {
    validate_target(target_percentage)?;
    if total_classes < 0 || total_classes > u32::MAX as i64 {
        return Err(EngineError::InvalidInput(format!(
            "total classes must be between 0 and {}, got {}",
            u32::MAX,
            total_classes
        )));
    }
    if attended_classes < 0 || attended_classes > total_classes {
        return Err(EngineError::InvalidInput(format!(
            "attended classes must be between 0 and {}, got {}",
            total_classes, attended_classes
        )));
    }

    if total_classes == 0 {
        return Ok(AttendanceStat {
            percentage: 0,
            status: status_for(0),
            classes_needed: 0,
            meets_target: false,
        });
    }

    let percentage = round_percentage(attended_classes as u64, total_classes as u64);
    let total = total_classes as f64;
    let attended = attended_classes as f64;

    let (classes_needed, meets_target) = if 100.0 * attended < target_percentage * total {
        // (attended + x) / (total + x) >= target / 100
        let x = (target_percentage * total - 100.0 * attended) / (100.0 - target_percentage);
        (class_count((x - EPSILON).ceil())?, false)
    } else {
        // attended / (total + x) >= target / 100
        let x = (100.0 * attended - target_percentage * total) / target_percentage;
        (class_count((x + EPSILON).floor())?, true)
    };

    let stat = AttendanceStat {
        percentage,
        status: status_for(percentage),
        classes_needed,
        meets_target,
    };
    debug!(total_classes, attended_classes, target_percentage, ?stat, "computed attendance stat");
    Ok(stat)
}

pub fn record_stat(record: &AttendanceRecord, target_percentage: f64) -> Result<AttendanceStat> {
    compute_stat(
        i64::from(record.total_classes),
        i64::from(record.attended_classes),
        target_percentage,
    )
}

pub fn status_for(percentage: u8) -> AttendanceStatus {
    if percentage >= SAFE_THRESHOLD {
        AttendanceStatus::Safe
    } else if percentage >= WARNING_THRESHOLD {
        AttendanceStatus::Warning
    } else {
        AttendanceStatus::Critical
    }
}

pub fn validate_target(target_percentage: f64) -> Result<()> {
    if !target_percentage.is_finite() || target_percentage <= 0.0 || target_percentage >= 100.0 {
        return Err(EngineError::InvalidInput(format!(
            "target percentage must be strictly between 0 and 100, got {}",
            target_percentage
        )));
    }
    Ok(())
}

/// One-line advice for a subject.
pub fn insight(stat: &AttendanceStat) -> String {
    let plural = |n: u64| if n == 1 { "class" } else { "classes" };
    let n = stat.classes_needed;

    match stat.status {
        AttendanceStatus::Critical => "Attendance critical - no bunking allowed".to_string(),
        _ if stat.meets_target => format!("You can bunk {} {} safely", n, plural(n)),
        _ => format!("Attend {} more {} to stay safe", n, plural(n)),
    }
}

pub fn summarize(subjects: &[Subject], target_percentage: f64) -> Result<AttendanceSummary> {
    let mut summary = AttendanceSummary {
        total_subjects: subjects.len(),
        ..Default::default()
    };

    for subject in subjects {
        let stat = record_stat(&subject.attendance, target_percentage)?;
        match stat.status {
            AttendanceStatus::Safe => summary.safe_subjects += 1,
            AttendanceStatus::Warning => summary.warning_subjects += 1,
            AttendanceStatus::Critical => summary.critical_subjects += 1,
        }
        summary.subjects.push(SubjectStat {
            id: subject.id,
            name: subject.name.clone(),
            stat,
        });
    }

    if !summary.subjects.is_empty() {
        let sum: u64 = summary.subjects.iter().map(|s| u64::from(s.stat.percentage)).sum();
        let n = summary.subjects.len() as u64;
        summary.average_attendance = ((2 * sum + n) / (2 * n)) as u8;
    }

    Ok(summary)
}

// Whole, non-negative class count; targets close to 0 or 100 can push it past u64.
fn class_count(x: f64) -> Result<u64> {
    let x = x.max(0.0);
    if !x.is_finite() || x >= u64::MAX as f64 {
        return Err(EngineError::InvalidInput(format!(
            "classes needed is out of range for this target ({})",
            x
        )));
    }
    Ok(x as u64)
}

// round-half-up of attended / total * 100
fn round_percentage(attended: u64, total: u64) -> u8 {
    ((200 * attended + total) / (2 * total)) as u8
}
