//! Turn raw per-participant votes into a ranked result set.
//!
//! Pure aggregation: counts per vote type, a ranking score, and a top-choice
//! flag per option. Results are recomputed fresh from current vote data on
//! every call — nothing is cached or mutated incrementally.
//!
//! # Ranking
//!
//! `score = (yes + ifNeedBe) * 1000 + yes`. Total availability (yes plus
//! maybe) is the primary signal; the `yes` count breaks ties within equal
//! availability. The scale keeps availability dominant for any realistic
//! participant count. Options sharing the maximum score are all flagged as
//! top choice — ties are surfaced, not resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a participant answered for one option. A missing vote is treated the
/// same as an explicit `no`: it contributes to neither availability counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VoteType {
    Yes,
    IfNeedBe,
    No,
}

/// One participant's answer for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub option_id: String,
    pub vote_type: VoteType,
}

/// A participant and every vote they cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub votes: Vec<Vote>,
}

/// A poll option up for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
}

/// Explicit vote tallies for one option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCounts {
    pub yes: u32,
    pub if_need_be: u32,
    pub no: u32,
}

/// One option's scored result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionResult {
    pub option_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub vote_counts: VoteCounts,
    pub score: u64,
    pub is_top_choice: bool,
}

/// The full ranked result set for a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPoll {
    pub poll_id: String,
    pub participant_count: usize,
    pub options: Vec<OptionResult>,
    pub high_score: u64,
}

/// Availability dominates the yes tie-breaker as long as per-option `yes`
/// counts stay below this scale.
const AVAILABILITY_SCALE: u64 = 1000;

/// Score every option of a poll against the participants' votes.
///
/// Counts `yes` / `ifNeedBe` / explicit `no` votes per option, computes the
/// ranking score, and flags every option whose score equals the maximum.
/// Output order matches input option order. Infallible: no options means an
/// empty result set with `high_score == 0`.
///
/// Votes referencing an unknown option id are ignored; a participant with
/// no vote on an option simply contributes to no counter.
///
/// # Examples
///
/// ```
/// use slot_engine::scoring::{score_options, Participant, PollOption, Vote, VoteType};
/// use chrono::{TimeZone, Utc};
///
/// let options = vec![PollOption {
///     id: "a".into(),
///     start_time: Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
///     duration_minutes: 60,
/// }];
/// let participants = vec![Participant {
///     id: "p1".into(),
///     votes: vec![Vote { option_id: "a".into(), vote_type: VoteType::Yes }],
/// }];
///
/// let result = score_options("poll-1", &options, &participants);
/// assert_eq!(result.options[0].score, 1001);
/// assert!(result.options[0].is_top_choice);
/// ```
pub fn score_options(
    poll_id: &str,
    options: &[PollOption],
    participants: &[Participant],
) -> ScoredPoll {
    let mut results: Vec<OptionResult> = options
        .iter()
        .map(|option| {
            let mut counts = VoteCounts::default();
            for participant in participants {
                for vote in &participant.votes {
                    if vote.option_id == option.id {
                        match vote.vote_type {
                            VoteType::Yes => counts.yes += 1,
                            VoteType::IfNeedBe => counts.if_need_be += 1,
                            VoteType::No => counts.no += 1,
                        }
                    }
                }
            }

            let availability = u64::from(counts.yes) + u64::from(counts.if_need_be);
            let score = availability * AVAILABILITY_SCALE + u64::from(counts.yes);

            OptionResult {
                option_id: option.id.clone(),
                start_time: option.start_time,
                duration_minutes: option.duration_minutes,
                vote_counts: counts,
                score,
                is_top_choice: false,
            }
        })
        .collect();

    let high_score = results.iter().map(|r| r.score).max().unwrap_or(0);
    for result in &mut results {
        result.is_top_choice = result.score == high_score;
    }

    ScoredPoll {
        poll_id: poll_id.to_string(),
        participant_count: participants.len(),
        options: results,
        high_score,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
