//! Wire shapes for slot generation and the end-to-end pipeline.
//!
//! The surrounding API layer hands over a [`SlotRequest`] deserialized
//! straight from JSON: a duration, an optional IANA timezone, and `times` as
//! either an array mixing absolute datetime strings with recurring-pattern
//! objects, or a single bare pattern object. [`generate_slots`] resolves the
//! literals, expands the patterns, and returns the globally deduplicated
//! candidate list for the caller to cap and persist.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Deserialize;

use crate::clock::{parse_timezone, resolve_instant};
use crate::dedupe::dedupe_slots;
use crate::error::SlotError;
use crate::generator::{expand_pattern, TimeSlot, WeeklyPattern};

/// A recurring-pattern object as it appears on the wire. Dates, times and
/// weekday names stay as strings here; [`PatternEntry::to_pattern`] parses
/// them into a typed [`WeeklyPattern`] with proper errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternEntry {
    pub start_date: String,
    pub end_date: String,
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub interval: Option<u32>,
}

/// One entry of a request's `times` array: an absolute ISO-8601 datetime
/// string or a recurring-pattern object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeEntry {
    Instant(String),
    Pattern(PatternEntry),
}

/// The `times` field: an array of entries, or a single bare pattern object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimesInput {
    Many(Vec<TimeEntry>),
    One(PatternEntry),
}

/// A slot-generation request as received from the API layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    /// Slot duration in minutes; `0` for date-only / all-day options.
    pub duration: u32,
    /// IANA timezone name; absent means floating (literal UTC) input.
    #[serde(default)]
    pub timezone: Option<String>,
    pub times: TimesInput,
}

impl PatternEntry {
    /// Parse the wire strings into a typed [`WeeklyPattern`].
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidDatetime`] for an unparseable date, time,
    /// or weekday name.
    pub fn to_pattern(&self) -> Result<WeeklyPattern, SlotError> {
        Ok(WeeklyPattern {
            start_date: parse_civil_date(&self.start_date)?,
            end_date: parse_civil_date(&self.end_date)?,
            days: self
                .days
                .iter()
                .map(|day| parse_weekday(day))
                .collect::<Result<_, _>>()?,
            from_time: parse_civil_time(&self.start_time)?,
            to_time: parse_civil_time(&self.end_time)?,
            interval_minutes: self.interval,
        })
    }
}

/// Generate the deduplicated slot candidates for a request.
///
/// The timezone is validated once up front, before any entry is processed.
/// Literal entries resolve through the clock with the request timezone and
/// carry the request duration; pattern entries expand day by day. The
/// combined output is deduplicated by (start, duration), first occurrence
/// first.
///
/// Zero resulting slots is a valid outcome (every pattern degraded to an
/// empty window), distinct from a validation failure. Any entry that fails
/// to parse aborts the whole request — no partial results.
///
/// # Errors
///
/// [`SlotError::InvalidTimezone`] for an unknown zone name,
/// [`SlotError::InvalidDatetime`] for a malformed literal, date, time, or
/// weekday name.
pub fn generate_slots(request: &SlotRequest) -> Result<Vec<TimeSlot>, SlotError> {
    let timezone = request.timezone.as_deref();
    if let Some(name) = timezone {
        parse_timezone(name)?;
    }

    let mut slots = Vec::new();
    match &request.times {
        TimesInput::One(entry) => {
            slots.extend(expand_pattern(
                &entry.to_pattern()?,
                timezone,
                request.duration,
            )?);
        }
        TimesInput::Many(entries) => {
            for entry in entries {
                match entry {
                    TimeEntry::Instant(datetime) => slots.push(TimeSlot {
                        start_time: resolve_instant(datetime, timezone)?,
                        duration_minutes: request.duration,
                    }),
                    TimeEntry::Pattern(pattern) => slots.extend(expand_pattern(
                        &pattern.to_pattern()?,
                        timezone,
                        request.duration,
                    )?),
                }
            }
        }
    }

    Ok(dedupe_slots(slots))
}

// ── Wire-format parsers ─────────────────────────────────────────────────────

fn parse_civil_date(s: &str) -> Result<NaiveDate, SlotError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidDatetime(format!("'{s}'")))
}

fn parse_civil_time(s: &str) -> Result<NaiveTime, SlotError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| SlotError::InvalidDatetime(format!("'{s}'")))
}

/// Parse a weekday name (case-insensitive, full and abbreviated forms).
fn parse_weekday(s: &str) -> Result<Weekday, SlotError> {
    match s.to_ascii_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Ok(Weekday::Tue),
        "wednesday" | "wed" => Ok(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Ok(Weekday::Thu),
        "friday" | "fri" => Ok(Weekday::Fri),
        "saturday" | "sat" => Ok(Weekday::Sat),
        "sunday" | "sun" => Ok(Weekday::Sun),
        _ => Err(SlotError::InvalidDatetime(format!("unknown weekday '{s}'"))),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn request(json: &str) -> SlotRequest {
        serde_json::from_str(json).expect("request JSON should deserialize")
    }

    #[test]
    fn test_literal_instants_deduped() {
        let req = request(
            r#"{
                "duration": 60,
                "times": ["2025-01-15T09:00:00Z", "2025-01-15T09:00:00Z"]
            }"#,
        );
        let slots = generate_slots(&req).unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(
            slots[0].start_time,
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
        );
        assert_eq!(slots[0].duration_minutes, 60);
    }

    #[test]
    fn test_single_bare_pattern_object() {
        let req = request(
            r#"{
                "duration": 60,
                "timezone": "UTC",
                "times": {
                    "startDate": "2025-01-15",
                    "endDate": "2025-01-15",
                    "days": ["wed"],
                    "startTime": "09:00",
                    "endTime": "12:00"
                }
            }"#,
        );
        let slots = generate_slots(&req).unwrap();
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_mixed_literals_and_patterns() {
        // The literal 09:00Z collides with the pattern's first slot and is
        // collapsed by the global dedup.
        let req = request(
            r#"{
                "duration": 60,
                "timezone": "UTC",
                "times": [
                    "2025-01-15T09:00:00Z",
                    {
                        "startDate": "2025-01-15",
                        "endDate": "2025-01-15",
                        "days": ["wed"],
                        "startTime": "09:00",
                        "endTime": "12:00",
                        "interval": 60
                    }
                ]
            }"#,
        );
        let slots = generate_slots(&req).unwrap();

        assert_eq!(slots.len(), 3);
        assert_eq!(
            slots[0].start_time,
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_pattern_in_named_timezone() {
        let req = request(
            r#"{
                "duration": 60,
                "timezone": "America/New_York",
                "times": {
                    "startDate": "2025-01-15",
                    "endDate": "2025-01-15",
                    "days": ["wed"],
                    "startTime": "09:00",
                    "endTime": "12:00"
                }
            }"#,
        );
        let slots = generate_slots(&req).unwrap();

        assert_eq!(slots.len(), 3);
        // EST (UTC-5): 09:00 local = 14:00 UTC
        assert_eq!(
            slots[0].start_time,
            Utc.with_ymd_and_hms(2025, 1, 15, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_all_day_options_from_date_literals() {
        let req = request(
            r#"{
                "duration": 0,
                "times": ["2025-01-15", "2025-01-16"]
            }"#,
        );
        let slots = generate_slots(&req).unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].duration_minutes, 0);
        assert_eq!(
            slots[0].start_time,
            Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_timezone_rejected_before_any_work() {
        let req = request(
            r#"{
                "duration": 60,
                "timezone": "Middle/Nowhere",
                "times": ["2025-01-15T09:00:00Z"]
            }"#,
        );
        assert!(matches!(
            generate_slots(&req),
            Err(SlotError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_bad_literal_aborts_whole_request() {
        let req = request(
            r#"{
                "duration": 60,
                "times": ["2025-01-15T09:00:00Z", "not a datetime"]
            }"#,
        );
        assert!(matches!(
            generate_slots(&req),
            Err(SlotError::InvalidDatetime(_))
        ));
    }

    #[test]
    fn test_unknown_weekday_name_rejected() {
        let req = request(
            r#"{
                "duration": 60,
                "times": {
                    "startDate": "2025-01-15",
                    "endDate": "2025-01-15",
                    "days": ["wed", "someday"],
                    "startTime": "09:00",
                    "endTime": "12:00"
                }
            }"#,
        );
        let err = generate_slots(&req).unwrap_err().to_string();
        assert!(err.contains("someday"), "got: {err}");
    }

    #[test]
    fn test_full_weekday_names_accepted() {
        assert_eq!(parse_weekday("Wednesday").unwrap(), Weekday::Wed);
        assert_eq!(parse_weekday("SUN").unwrap(), Weekday::Sun);
    }

    #[test]
    fn test_empty_patterns_degrade_to_zero_slots() {
        // An inverted window is "no options produced", not an error.
        let req = request(
            r#"{
                "duration": 60,
                "times": {
                    "startDate": "2025-01-15",
                    "endDate": "2025-01-15",
                    "days": ["wed"],
                    "startTime": "12:00",
                    "endTime": "09:00"
                }
            }"#,
        );
        let slots = generate_slots(&req).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_seconds_accepted_in_wire_times() {
        let entry = PatternEntry {
            start_date: "2025-01-15".to_string(),
            end_date: "2025-01-15".to_string(),
            days: vec!["wed".to_string()],
            start_time: "09:00:00".to_string(),
            end_time: "12:00:00".to_string(),
            interval: None,
        };
        let pattern = entry.to_pattern().unwrap();
        assert_eq!(pattern.from_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }
}
