//! Collapse slot sequences to a set unique by (start, duration).
//!
//! Pure set-reduction: first occurrence wins, relative order is preserved,
//! and the operation is idempotent.

use std::collections::HashSet;

use crate::generator::TimeSlot;

/// Remove duplicate slots, keeping the first occurrence of each distinct
/// (start_time, duration_minutes) pair in its original position.
///
/// Two slots with the same start but different durations are distinct
/// options and both survive. Never fails; empty input yields empty output.
pub fn dedupe_slots(slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
    let mut seen = HashSet::with_capacity(slots.len());
    slots
        .into_iter()
        .filter(|slot| seen.insert((slot.start_time, slot.duration_minutes)))
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────
