//! # slot-engine
//!
//! Deterministic scheduling core for group polls.
//!
//! Converts an organizer's proposal — literal instants, whole days, or a
//! recurring weekly time window — into a deduplicated set of schedulable
//! UTC time slots, with correct handling of IANA timezones and floating
//! (timezone-less) input. Separately, turns raw per-participant votes on
//! those slots into a ranked result set with scores and top-choice flags.
//!
//! Everything is a pure, synchronous transformation over plain data: no
//! persistence, no I/O, no shared mutable state. The surrounding CRUD/API
//! layer calls in with request shapes and persists what comes back.
//!
//! ## Modules
//!
//! - [`clock`] — Civil datetime string + optional IANA zone → UTC instant
//! - [`generator`] — Weekly pattern → concrete time slots
//! - [`dedupe`] — Collapse slots to a set unique by (start, duration)
//! - [`scoring`] — Participant votes → ranked option results
//! - [`request`] — Wire shapes and the generate → dedupe pipeline
//! - [`error`] — Error types

pub mod clock;
pub mod dedupe;
pub mod error;
pub mod generator;
pub mod request;
pub mod scoring;

pub use clock::{parse_timezone, resolve_instant};
pub use dedupe::dedupe_slots;
pub use error::SlotError;
pub use generator::{expand_pattern, TimeSlot, WeeklyPattern};
pub use request::{generate_slots, PatternEntry, SlotRequest, TimeEntry, TimesInput};
pub use scoring::{
    score_options, OptionResult, Participant, PollOption, ScoredPoll, Vote, VoteCounts, VoteType,
};
