//! Civil datetime resolution against IANA timezones.
//!
//! Turns a civil date/time string plus an optional IANA timezone name into
//! an absolute UTC instant. Every other module resolves time through here,
//! so timezone-library specifics stay out of the slot expansion logic.
//!
//! A missing timezone means "floating" time: the civil value is stored as
//! literal UTC with no DST semantics attached.
//!
//! # DST Policy
//!
//! Civil wall-clock times near a DST transition can exist twice (fall-back
//! fold) or not at all (spring-forward gap). Resolution is deterministic:
//!
//! - fold: the **earlier** instant wins (the pre-transition offset);
//! - gap: the wall time is shifted forward one hour and re-resolved.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::SlotError;

/// Parse an IANA timezone name into `Tz`.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] if the name is not in the IANA
/// database. The zone table is compiled into the binary by `chrono-tz`;
/// lookup is a static match, no I/O.
pub fn parse_timezone(name: &str) -> Result<Tz, SlotError> {
    name.parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(format!("'{name}'")))
}

/// Resolve a civil datetime string to an absolute UTC instant.
///
/// Accepted forms, tried in order:
///
/// 1. RFC 3339 with an explicit offset or `Z` — the offset is honored
///    verbatim and `timezone` is ignored for the conversion (it is still
///    validated when supplied).
/// 2. Naive datetime (`2025-01-15T09:00:00` or `2025-01-15T09:00`) —
///    interpreted as wall-clock time in `timezone` when given, otherwise
///    as literal UTC (floating time).
/// 3. Date only (`2025-01-15`) — midnight of that civil date, same zone
///    rules. Supports date-only / all-day options.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] if `timezone` is not a valid IANA
/// name (never silently defaulted), or [`SlotError::InvalidDatetime`] if the
/// string matches none of the accepted forms.
///
/// # Examples
///
/// ```
/// use slot_engine::clock::resolve_instant;
///
/// // Wall-clock time in New York, January = EST (UTC-5)
/// let instant = resolve_instant("2025-01-15T09:00:00", Some("America/New_York")).unwrap();
/// assert_eq!(instant.to_rfc3339(), "2025-01-15T14:00:00+00:00");
/// ```
pub fn resolve_instant(datetime: &str, timezone: Option<&str>) -> Result<DateTime<Utc>, SlotError> {
    // Validate the zone up front even when the string carries its own offset.
    let tz = timezone.map(parse_timezone).transpose()?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = parse_civil(datetime)?;
    Ok(match tz {
        Some(tz) => from_wall_clock(naive, tz),
        None => Utc.from_utc_datetime(&naive),
    })
}

/// Resolve a civil (date, time-of-day) pair to a UTC instant.
///
/// `None` timezone means floating: the pair is read as literal UTC. Total
/// for any valid zone — DST gaps and folds resolve per the module policy.
pub(crate) fn resolve_local(date: NaiveDate, time: NaiveTime, tz: Option<Tz>) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz {
        Some(tz) => from_wall_clock(naive, tz),
        None => Utc.from_utc_datetime(&naive),
    }
}

/// Parse the civil (offset-free) datetime forms.
fn parse_civil(s: &str) -> Result<NaiveDateTime, SlotError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(SlotError::InvalidDatetime(format!("'{s}'")))
}

/// Map a wall-clock time in `tz` to UTC under the module's DST policy.
fn from_wall_clock(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // Fall-back fold: the wall time exists twice, take the earlier instant.
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        // Spring-forward gap: the wall time does not exist, shift forward one
        // hour and retry. Terminates — every zone's gaps are finite.
        LocalResult::None => from_wall_clock(naive + chrono::Duration::hours(1), tz),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
