/*
 * MIT License
 *
 * Copyright (c) 2022 Joseph Sacchini
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use super::{color::*, prelude::*};
use std::cmp::Ordering;
use thiserror::Error;

/// When this few (or fewer) candidates remain, the recommendation engine searches only within the
/// candidates themselves, favoring guesses that can win immediately over purely-informative
/// probes. Tuned for responsiveness rather than derived; see also [SHORTLIST_SIZE].
pub const FINISH_THRESHOLD: usize = 15;

/// How many heuristically ranked guesses get exact entropy scoring when the candidate set is
/// large. Entropy-scoring the whole guess universe scales with |universe| * |candidates|, so this
/// bounds the expensive part. Tuned for responsiveness rather than derived.
pub const SHORTLIST_SIZE: usize = 2500;

/// Default count of guesses returned by [top_guesses].
pub const DEFAULT_TOP_GUESSES: usize = 10;

/// Multiplier applied to the positional letter frequency in the heuristic score. Positional hits
/// (potential greens) are worth a bit more than mere letter coverage.
const POSITIONAL_BONUS: WordleFloat = 1.2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverErr {
    #[error("guess and answer must be exactly {WORD_SIZE} letters")]
    InvalidLength,
    #[error("weight vector has {weights} entries but there are {candidates} candidates")]
    WeightLengthMismatch { candidates: usize, weights: usize },
    #[error("no possible words remain (feedback history is contradictory)")]
    NoCandidates,
}

///
/// Computes the feedback coloring the official game would show for `guess` against `answer`.
///
/// This is the validating entry point: inputs are trimmed and lowercased, and anything that is not
/// exactly [WORD_SIZE] lowercase letters afterwards is rejected with [SolverErr::InvalidLength].
/// Internal hot paths skip this and call [Colorings::with_guess_answer] on pre-validated words.
///
pub fn feedback(guess: &str, answer: &str) -> Result<Colorings, SolverErr> {
    let guess = normalize_wordle_word(guess);
    let answer = normalize_wordle_word(answer);
    if !is_wordle_str(&guess) || !is_wordle_str(&answer) {
        return Err(SolverErr::InvalidLength);
    }

    Ok(Colorings::with_guess_answer(&guess, &answer))
}

///
/// Retains exactly the candidates that are consistent with observing `pattern` after playing
/// `guess`: those answers for which the feedback engine reproduces `pattern`.
///
/// Order is preserved and the input is untouched. An empty result is valid, and means the
/// feedback history is contradictory; surfacing that is the caller's job.
///
pub fn filter_candidates<'a>(
    candidates: &[&'a str],
    guess: &str,
    pattern: Colorings,
) -> Vec<&'a str> {
    debug_assert!(is_wordle_str(guess));
    candidates
        .iter()
        .copied()
        .filter(|answer| Colorings::with_guess_answer(guess, answer) == pattern)
        .collect()
}

///
/// Scores a guess by the Shannon entropy (in bits) of the partition it induces over the
/// candidates: each candidate falls into the bucket of the coloring it would produce, buckets
/// accumulate candidate weight, and H = sum of p * log2(1/p) over buckets with positive mass.
///
/// A guess that splits the candidates into many evenly weighted buckets scores highest, because
/// whatever coloring comes back eliminates the most weight on average.
///
/// Weights are optional; omitting them means uniform 1.0 per candidate. Non-positive weights
/// contribute no mass. A supplied weight vector must match the candidate count, and if no
/// positive mass exists at all the score is 0 (no usable signal).
///
pub fn score_guess_entropy(
    guess: &str,
    candidates: &[&str],
    weights: Option<&[WordleFloat]>,
) -> Result<WordleFloat, SolverErr> {
    debug_assert!(is_wordle_str(guess));
    check_weights(candidates, weights)?;

    // one bucket per coloring, indexed by Colorings::to_code, so everything stays on the stack
    let mut buckets = [0.0 as WordleFloat; Colorings::NUM_STATES];
    let mut total: WordleFloat = 0.0;

    for (idx, answer) in candidates.iter().enumerate() {
        let w = match weights {
            Some(ws) => ws[idx],
            None => 1.0,
        };
        if w <= 0.0 {
            continue;
        }

        total += w;
        let code = Colorings::with_guess_answer(guess, answer).to_code();
        buckets[code as usize] += w;
    }

    if total <= 0.0 {
        return Ok(0.0);
    }

    Ok(buckets
        .iter()
        .filter(|v| *v > &0.0)
        .map(|v| {
            let p = v / total;
            p * -(p.log2())
        })
        .sum())
}

///
/// Letter-frequency statistics over a (weighted) candidate set, used to cheaply approximate how
/// informative a guess is without running the full feedback simulation against every candidate.
///
/// Two tables are kept, both normalized by total candidate weight:
///   * overall: how much candidate weight contains each letter (counted once per candidate)
///   * positional: how much candidate weight has each letter at each position
///
pub struct LetterFrequencies {
    overall: [WordleFloat; ALPHABET_SIZE],
    positional: [[WordleFloat; ALPHABET_SIZE]; WORD_SIZE],
}

impl LetterFrequencies {
    pub fn from_candidates(candidates: &[&str], weights: Option<&[WordleFloat]>) -> Self {
        debug_assert!(weights.map(|ws| ws.len() == candidates.len()).unwrap_or(true));

        let mut overall = [0.0 as WordleFloat; ALPHABET_SIZE];
        let mut positional = [[0.0 as WordleFloat; ALPHABET_SIZE]; WORD_SIZE];
        let mut total: WordleFloat = 0.0;

        for (idx, word) in candidates.iter().enumerate() {
            let w = match weights {
                Some(ws) => ws[idx],
                None => 1.0,
            };
            if w <= 0.0 {
                continue;
            }

            total += w;
            let bytes = word.as_bytes();
            let mut seen = [false; ALPHABET_SIZE];
            for i in 0..WORD_SIZE {
                let li = letter_idx(bytes[i]);
                positional[i][li] += w;
                if !seen[li] {
                    seen[li] = true;
                    overall[li] += w;
                }
            }
        }

        // a weightless candidate set produces all-zero tables rather than NaNs
        let n = if total > 0.0 { total } else { 1.0 };
        for c in 0..ALPHABET_SIZE {
            overall[c] /= n;
        }
        #[allow(clippy::needless_range_loop)]
        for i in 0..WORD_SIZE {
            for c in 0..ALPHABET_SIZE {
                positional[i][c] /= n;
            }
        }

        Self {
            overall,
            positional,
        }
    }

    ///
    /// Approximate ranking score for a guess: positional frequency at each slot (scaled up, since
    /// a positional hit is a likely green) plus, once per distinct letter, the overall frequency
    /// of that letter. Deliberately not exact; only used to bound the set handed to
    /// [score_guess_entropy].
    ///
    pub fn heuristic_score(&self, guess: &str) -> WordleFloat {
        debug_assert!(is_wordle_str(guess));
        let bytes = guess.as_bytes();
        let mut seen = [false; ALPHABET_SIZE];
        let mut score = 0.0;

        for i in 0..WORD_SIZE {
            let li = letter_idx(bytes[i]);
            score += self.positional[i][li] * POSITIONAL_BONUS;
            if !seen[li] {
                seen[li] = true;
                score += self.overall[li];
            }
        }

        score
    }

    ///
    /// Ranks the guess universe descending by heuristic score and keeps the best `size` words.
    /// The sort is stable, so equal-scored guesses keep their input order.
    ///
    pub fn shortlist<'a>(&self, allowed_guesses: &[&'a str], size: usize) -> Vec<&'a str> {
        let mut scored: Vec<(&'a str, WordleFloat)> = allowed_guesses
            .iter()
            .map(|g| (*g, self.heuristic_score(g)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(size);
        scored.into_iter().map(|(g, _)| g).collect()
    }
}

/// A guess recommendation: the word plus its entropy in bits. The score is
/// [WordleFloat::INFINITY] when a single candidate remains (nothing left to learn, just win).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub word: &'a str,
    pub score: WordleFloat,
}

///
/// Inputs to [best_next_guess]. The threshold/shortlist tunables default to the documented
/// constants; callers under different latency constraints can override them.
///
pub struct RecommendOptions<'a, 'b> {
    /// remaining possible answers, in insertion order
    pub candidates: &'b [&'a str],
    /// every word the game accepts as a guess (can include probe-only words)
    pub allowed_guesses: &'b [&'a str],
    /// optional candidate prior weights, parallel to `candidates`
    pub weights: Option<&'b [WordleFloat]>,
    pub finish_threshold: usize,
    pub shortlist_size: usize,
}

impl<'a, 'b> RecommendOptions<'a, 'b> {
    pub fn new(candidates: &'b [&'a str], allowed_guesses: &'b [&'a str]) -> Self {
        Self {
            candidates,
            allowed_guesses,
            weights: None,
            finish_threshold: FINISH_THRESHOLD,
            shortlist_size: SHORTLIST_SIZE,
        }
    }

    pub fn with_weights(mut self, weights: &'b [WordleFloat]) -> Self {
        self.weights = Some(weights);
        self
    }
}

///
/// Picks the next guess that maximizes expected information gain.
///
/// * no candidates -> [SolverErr::NoCandidates] (the feedback history contradicts itself)
/// * one candidate -> that word, with an infinite score sentinel
/// * at most `finish_threshold` candidates -> exact entropy over the candidates only, so the
///   recommendation can actually be the answer instead of a pure probe
/// * otherwise -> heuristic shortlist over the whole guess universe, then exact entropy over the
///   shortlist
///
/// Ties go to the first-encountered word in the search space, so results are stable.
///
pub fn best_next_guess<'a>(opts: &RecommendOptions<'a, '_>) -> Result<ScoredCandidate<'a>, SolverErr> {
    let candidates = opts.candidates;
    if candidates.is_empty() {
        return Err(SolverErr::NoCandidates);
    }
    check_weights(candidates, opts.weights)?;

    if candidates.len() == 1 {
        return Ok(ScoredCandidate {
            word: candidates[0],
            score: WordleFloat::INFINITY,
        });
    }

    if candidates.len() <= opts.finish_threshold {
        return best_scored(candidates, candidates, opts.weights);
    }

    let freqs = LetterFrequencies::from_candidates(candidates, opts.weights);
    let shortlist = freqs.shortlist(opts.allowed_guesses, opts.shortlist_size);
    best_scored(&shortlist, candidates, opts.weights)
}

fn best_scored<'a>(
    search_space: &[&'a str],
    candidates: &[&str],
    weights: Option<&[WordleFloat]>,
) -> Result<ScoredCandidate<'a>, SolverErr> {
    let mut best: Option<ScoredCandidate<'a>> = None;
    for guess in search_space.iter().copied() {
        let score = score_guess_entropy(guess, candidates, weights)?;
        // strictly-greater keeps the earliest word on ties
        if best.map(|b| score > b.score).unwrap_or(true) {
            best = Some(ScoredCandidate { word: guess, score });
        }
    }

    best.ok_or(SolverErr::NoCandidates)
}

///
/// Exact entropy scores for every word in `allowed_guesses` (no heuristic shortcut), best `limit`
/// first. Ties keep input order. Intended for exploratory display; callers should cap the guess
/// universe themselves while the candidate set is still large.
///
pub fn top_guesses<'a>(
    candidates: &[&str],
    allowed_guesses: &[&'a str],
    weights: Option<&[WordleFloat]>,
    limit: usize,
) -> Result<Vec<ScoredCandidate<'a>>, SolverErr> {
    check_weights(candidates, weights)?;

    let mut scored = Vec::with_capacity(allowed_guesses.len());
    for guess in allowed_guesses {
        scored.push(ScoredCandidate {
            word: *guess,
            score: score_guess_entropy(guess, candidates, weights)?,
        });
    }

    Ok(scored.into_iter().top_k(limit, |sc| sc.score).collect())
}

fn check_weights(candidates: &[&str], weights: Option<&[WordleFloat]>) -> Result<(), SolverErr> {
    match weights {
        Some(ws) if ws.len() != candidates.len() => Err(SolverErr::WeightLengthMismatch {
            candidates: candidates.len(),
            weights: ws.len(),
        }),
        _ => Ok(()),
    }
}
