use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use anyhow::{anyhow, Result};

use crate::error::{EngineError, Result as EngineResult};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses a strict 24-hour `HH:MM` string into minutes since midnight.
pub fn time_to_minutes(hhmm: &str) -> EngineResult<u32> {
    let malformed = || EngineError::MalformedTime(hhmm.to_string());

    let (hours, minutes) = hhmm.split_once(':').ok_or_else(malformed)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(malformed());
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
    if hours > 23 || minutes > 59 {
        return Err(malformed());
    }

    Ok(hours * 60 + minutes)
}

/// Formats minutes since midnight as `HH:MM`. `1440` renders as `24:00`.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn parse_day(s: &str) -> EngineResult<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(EngineError::InvalidDay(s.to_string())),
    }
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Weekday and minute-of-day of the local clock.
pub fn local_now() -> (Weekday, u32) {
    let now = Local::now();
    (now.weekday(), now.hour() * 60 + now.minute())
}

pub fn parse_human_date(input: &str) -> Result<DateTime<Utc>> {
    parse_human_date_from(input, Local::now().date_naive())
}

/// Resolves deadline shorthands relative to `today`.
pub fn parse_human_date_from(input: &str, today: NaiveDate) -> Result<DateTime<Utc>> {
    let input = input.trim();

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return end_of_day(today),
        "tomorrow" | "tom" => return end_of_day(add_days(today, 1)?),
        "eow" => {
            let days_to_sunday = 6 - today.weekday().num_days_from_monday() as i64;
            return end_of_day(add_days(today, days_to_sunday)?);
        }
        "eom" => {
            let first_of_next = if today.month() == 12 {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
            }
            .ok_or_else(|| anyhow!("Date out of range"))?;
            return end_of_day(add_days(first_of_next, -1)?);
        }
        _ => {}
    }

    // 2. Relative format (+3d, +2w)
    if let Some(rest) = input.strip_prefix('+') {
        if rest.len() < 2 {
            return Err(anyhow!("Invalid relative format: {}", input));
        }
        let (num_str, unit) = rest.split_at(rest.len() - 1);
        let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: {}", input))?;

        let days = match unit {
            "d" => Some(count),
            "w" => count.checked_mul(7),
            _ => return Err(anyhow!("Unknown unit in relative time: {}", unit)),
        };
        let target = add_days(today, days.ok_or_else(|| anyhow!("Date out of range"))?)?;
        return end_of_day(target);
    }

    // 3. Weekday format (fri, 2:fri)
    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target) = parse_day(day_str) {
            let mut days_needed = target.num_days_from_monday() as i64
                - today.weekday().num_days_from_monday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // 2:fri is the Friday after next
            let days_needed = (count - 1)
                .checked_mul(7)
                .and_then(|weeks| weeks.checked_add(days_needed))
                .ok_or_else(|| anyhow!("Date out of range"))?;
            return end_of_day(add_days(today, days_needed)?);
        }
    }

    // 4. Plain dates
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return end_of_day(d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    let local_dt = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| anyhow!("Invalid date: {}", date))?;
    Local
        .from_local_datetime(&local_dt)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Local time does not exist: {}", local_dt))
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|offset| date.checked_add_signed(offset))
        .ok_or_else(|| anyhow!("Date out of range"))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().filter(|c| *c >= 1).map(|c| (c, day)),
        None => Some((1, input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("09:30").unwrap(), 570);
        assert_eq!(time_to_minutes("00:00").unwrap(), 0);
        assert_eq!(time_to_minutes("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_time_to_minutes_rejects_malformed() {
        for bad in ["9:30", "24:00", "12:60", "0930", "ab:cd", "", "12:3", "+1:30", "12:30 "] {
            assert_eq!(
                time_to_minutes(bad),
                Err(EngineError::MalformedTime(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_minutes_to_time() {
        assert_eq!(minutes_to_time(570), "09:30");
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(1200), "20:00");
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("Mon").unwrap(), Weekday::Mon);
        assert_eq!(parse_day("sunday").unwrap(), Weekday::Sun);
        assert!(matches!(parse_day("someday"), Err(EngineError::InvalidDay(_))));
    }

    #[test]
    fn test_parse_weekday_token() {
        assert_eq!(parse_weekday_token("fri"), Some((1, "fri")));
        assert_eq!(parse_weekday_token("2:fri"), Some((2, "fri")));
        assert_eq!(parse_weekday_token("x:fri"), None);
        assert_eq!(parse_weekday_token("0:fri"), None);
    }

    #[test]
    fn test_parse_human_date_relative_to_anchor() {
        // 2026-10-14 is a Wednesday
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let local = |d: DateTime<Utc>| d.with_timezone(&Local).date_naive();

        assert_eq!(local(parse_human_date_from("today", today).unwrap()), today);
        assert_eq!(
            local(parse_human_date_from("fri", today).unwrap()),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );
        assert_eq!(
            local(parse_human_date_from("2:wed", today).unwrap()),
            NaiveDate::from_ymd_opt(2026, 10, 28).unwrap()
        );
        assert_eq!(
            local(parse_human_date_from("eow", today).unwrap()),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
        assert_eq!(
            local(parse_human_date_from("eom", today).unwrap()),
            NaiveDate::from_ymd_opt(2026, 10, 31).unwrap()
        );
        assert_eq!(
            local(parse_human_date_from("+3d", today).unwrap()),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
        assert_eq!(
            local(parse_human_date_from("2026-12-01", today).unwrap()),
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()
        );
        assert!(parse_human_date_from("someday", today).is_err());
        assert!(parse_human_date_from("+3y", today).is_err());
    }

    #[test]
    fn test_parse_human_date_out_of_range() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        for input in [
            "+99999999999999d",
            "+99999999999999w",
            "9999999999999999:fri",
            "9223372036854775807:mon",
        ] {
            let err = parse_human_date_from(input, today).unwrap_err();
            assert_eq!(err.to_string(), "Date out of range", "{input}");
        }
    }
}
