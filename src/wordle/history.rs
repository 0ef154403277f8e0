//! Historical "word of the day" support.
//!
//! Words that have already been an answer are very unlikely to repeat, so callers can de-weight
//! them when scoring. The current moment is always an explicit unix-millisecond parameter; this
//! module never reads the wall clock, which keeps everything deterministic under test.

use super::prelude::*;
use std::collections::HashSet;

/// The daily puzzle rolls over at 5:00 UTC (per community reverse-engineering and the source the
/// answer list was built from).
pub const ROLLOVER_UTC_HOUR: i64 = 5;

/// Unix day number of 2021-06-19, the first puzzle's date.
const ORIGIN_UNIX_DAY: i64 = 18_797;

/// Puzzle #0 ("cigar") became playable at 2021-06-19T05:00:00Z.
pub const ORIGIN_UNIX_MS: i64 = ORIGIN_UNIX_DAY * MS_PER_DAY + ROLLOVER_UTC_HOUR * MS_PER_HOUR;

/// Relative plausibility assigned to a known past answer (1.0 for everything else).
pub const DEFAULT_PAST_ANSWER_WEIGHT: WordleFloat = 0.05;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Index of the puzzle running at `now_unix_ms` (0 = the origin puzzle). Negative before the
/// origin.
pub fn wordle_index(now_unix_ms: i64) -> i64 {
    (now_unix_ms - ORIGIN_UNIX_MS).div_euclid(MS_PER_DAY)
}

///
/// The set of words known to have already been used as an answer at `now_unix_ms`: the first
/// `wordle_index` entries of the dated answer list. Today's own answer is not included (you are
/// presumably still solving it).
///
pub fn known_past_answers(answers_by_date: &[String], now_unix_ms: i64) -> HashSet<String> {
    let idx = wordle_index(now_unix_ms).max(0) as usize;
    answers_by_date
        .iter()
        .take(idx.min(answers_by_date.len()))
        .cloned()
        .collect()
}

///
/// Builds a weight vector parallel to `candidates`: `past_answer_weight` (clamped into [0, 1])
/// for known past answers, 1.0 otherwise.
///
pub fn build_past_answer_weights(
    candidates: &[&str],
    past: &HashSet<String>,
    past_answer_weight: WordleFloat,
) -> Vec<WordleFloat> {
    let w = past_answer_weight.clamp(0.0, 1.0);
    candidates
        .iter()
        .map(|c| if past.contains(*c) { w } else { 1.0 })
        .collect()
}

/// UTC calendar key ("YYYY-MM-DD") for `now_unix_ms`, used to partition cached first-guess
/// computations by day.
pub fn day_key(now_unix_ms: i64) -> String {
    let (y, m, d) = civil_from_days(now_unix_ms.div_euclid(MS_PER_DAY));
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// Days-since-epoch to (year, month, day), Gregorian. Howard Hinnant's civil_from_days.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    (y + if m <= 2 { 1 } else { 0 }, m, d)
}
