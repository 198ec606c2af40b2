//! Expand recurring weekly patterns into concrete UTC time slots.
//!
//! A pattern describes a civil date range, a set of weekdays, and a daily
//! time-of-day window. Expansion walks the range one calendar day at a time
//! and re-resolves each matching day's window through the clock — the UTC
//! offset of a civil time-of-day can shift mid-range at a DST transition,
//! so window instants are never reused across days.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::{parse_timezone, resolve_local};
use crate::dedupe::dedupe_slots;
use crate::error::SlotError;

/// One bookable (start instant, duration) pair — a single poll option
/// candidate.
///
/// Identity is the full pair: two slots are the same option iff they start
/// at the same instant **and** run for the same number of minutes.
/// `duration_minutes == 0` denotes a date-only / all-day option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
}

/// A recurring weekly availability pattern over a civil date range.
///
/// `days` is the set of weekdays that produce slots; an empty set yields
/// zero slots, not an error. `interval_minutes` is the step between slot
/// starts within a day's window; when absent, the slot duration is used
/// (back-to-back, non-overlapping slots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyPattern {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<Weekday>,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    pub interval_minutes: Option<u32>,
}

/// Expand a weekly pattern into concrete UTC time slots.
///
/// Walks civil dates from `start_date` to `end_date` inclusive. For each
/// date whose weekday is in `pattern.days`, the day's `[from_time, to_time)`
/// window is resolved to UTC instants in `timezone` (or read as literal UTC
/// when `None` — floating time), then stepped through by the pattern's
/// interval, emitting one slot per step whose occupied span fits inside the
/// window.
///
/// Degenerate inputs yield an empty result rather than an error: an inverted
/// window (`to_time <= from_time`), an empty weekday set, a range containing
/// no matching weekday, a duration longer than the window, or a zero step.
/// This lets batch generation across several patterns continue without one
/// empty pattern aborting the rest.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] if `timezone` is not a valid IANA
/// name. No partial results: the error is returned before any slot is
/// produced.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime, Weekday};
/// use slot_engine::generator::{expand_pattern, WeeklyPattern};
///
/// let pattern = WeeklyPattern {
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     days: vec![Weekday::Wed],
///     from_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     to_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
///     interval_minutes: None,
/// };
///
/// let slots = expand_pattern(&pattern, Some("UTC"), 60).unwrap();
/// assert_eq!(slots.len(), 3); // 09:00, 10:00, 11:00
/// ```
pub fn expand_pattern(
    pattern: &WeeklyPattern,
    timezone: Option<&str>,
    duration_minutes: u32,
) -> Result<Vec<TimeSlot>, SlotError> {
    let tz = timezone.map(parse_timezone).transpose()?;

    // An inverted or zero-length civil window can never produce a slot.
    if pattern.to_time <= pattern.from_time {
        return Ok(Vec::new());
    }

    let step_minutes = pattern.interval_minutes.unwrap_or(duration_minutes);
    if step_minutes == 0 {
        // Zero-duration options come from literal date entries, not from
        // pattern expansion; a zero step would never advance.
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    let mut date = pattern.start_date;
    while date <= pattern.end_date {
        if pattern.days.contains(&date.weekday()) {
            slots.extend(day_slots(date, pattern, tz, duration_minutes, step_minutes));
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    Ok(slots)
}

/// Emit the slots for a single matching day, deduplicated.
///
/// The window is resolved fresh for this date: `from_time` and `to_time` are
/// civil times-of-day, and their UTC offsets on this particular date may
/// differ from the pattern's first day. The window length is measured in
/// real (UTC) minutes, so a day straddling a DST transition gets exactly the
/// slots that fit its actual span.
fn day_slots(
    date: NaiveDate,
    pattern: &WeeklyPattern,
    tz: Option<Tz>,
    duration_minutes: u32,
    step_minutes: u32,
) -> Vec<TimeSlot> {
    let window_start = resolve_local(date, pattern.from_time, tz);
    let window_end = resolve_local(date, pattern.to_time, tz);

    // Re-check after resolving: DST gap shifting can invert a window that
    // was valid in civil time.
    if window_end <= window_start {
        return Vec::new();
    }
    let window_minutes = (window_end - window_start).num_minutes();

    let mut slots = Vec::new();
    let mut offset = 0i64;
    while offset + i64::from(duration_minutes) <= window_minutes {
        slots.push(TimeSlot {
            start_time: window_start + Duration::minutes(offset),
            duration_minutes,
        });
        offset += i64::from(step_minutes);
    }
    dedupe_slots(slots)
}

// ── Tests ───────────────────────────────────────────────────────────────────
