//! Interactive assistant: type each guess you played and the coloring the game showed you, and
//! get the next guess recommendation back. All input validation happens here, at the boundary;
//! the solver core only ever sees well-formed words and patterns.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use wordle_helper::wordle::*;

fn main() {
    env_logger::init();

    let now_unix_ms = unix_ms_now();
    let mut channel = SolverChannel::spawn(SolverAgent::from_embedded_data(now_unix_ms))
        .expect("should spawn solver thread");

    let allowed: HashSet<&str> = DATA.allowed_guesses.iter().map(String::as_str).collect();
    let mut candidates: Vec<String> = DATA.possible_words.clone();
    let mut history: Vec<(String, Colorings)> = Vec::new();

    println!(
        "wordle-helper: {} possible answers, {} guessable words",
        candidates.len(),
        allowed.len(),
    );

    // opening recommendation: day-keyed cache if fresh, otherwise computed like any other turn
    match read_cached_first_guess(&day_key(now_unix_ms)) {
        Some((word, score)) => println!("suggested opener: {} ({:.3} bits, cached)", word, score),
        None => {
            channel.request_compute(candidates.clone(), Some(DEFAULT_PAST_ANSWER_WEIGHT));
            report(channel.recv());
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let guess = match prompt_word(&mut lines, &allowed) {
            Some(w) => w,
            None => break,
        };
        let pattern = match prompt_pattern(&mut lines) {
            Some(p) => p,
            None => break,
        };

        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
        candidates = filter_candidates(&refs, &guess, pattern)
            .into_iter()
            .map(str::to_string)
            .collect();
        history.push((guess, pattern));

        print_history(&history);
        println!("{} candidates remain", candidates.len());

        if pattern.0.iter().all(|c| c == &Coloring::Correct) {
            println!("solved in {} guesses!", history.len());
            break;
        }
        if candidates.is_empty() {
            println!("no candidates remain; one of the entered patterns must be wrong");
            continue;
        }

        channel.request_compute(candidates.clone(), Some(DEFAULT_PAST_ANSWER_WEIGHT));
        report(channel.recv());

        if candidates.len() <= FINISH_THRESHOLD && candidates.len() > 1 {
            print_top_candidates(&candidates);
        }
    }
}

fn unix_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Reads a guess, rejecting anything that is not a 5-letter word the game would accept.
fn prompt_word(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    allowed: &HashSet<&str>,
) -> Option<String> {
    loop {
        let line = ask(lines, "guess> ")?;
        if line.is_empty() || line == "quit" {
            return None;
        }

        let word = normalize_wordle_word(&line);
        if !is_wordle_str(&word) {
            println!("'{}' is not a 5-letter word, try again", line);
            continue;
        }
        if !allowed.contains(word.as_str()) {
            println!("'{}' is not in the allowed guess list, try again", word);
            continue;
        }

        return Some(word);
    }
}

/// Reads a feedback pattern in the textual B/Y/G form.
fn prompt_pattern(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<Colorings> {
    loop {
        let line = ask(lines, "pattern (B=gray Y=yellow G=green)> ")?;
        if line.is_empty() || line == "quit" {
            return None;
        }

        match Colorings::from_pattern_str(&line) {
            Some(pattern) => return Some(pattern),
            None => println!("'{}' is not a valid pattern, expected 5 of B/Y/G", line),
        }
    }
}

fn ask(lines: &mut impl Iterator<Item = io::Result<String>>, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;
    Some(lines.next()?.ok()?.trim().to_string())
}

fn report(resp: Option<SolverResp>) {
    match resp {
        Some(SolverResp::Result {
            guess,
            score,
            took_ms,
            ..
        }) => {
            if score.is_infinite() {
                println!("the answer is: {} ({:.0}ms)", guess, took_ms);
            } else {
                println!("suggested guess: {} ({:.3} bits, {:.0}ms)", guess, score, took_ms);
            }
        }
        Some(SolverResp::Error { message, .. }) => println!("solver error: {}", message),
        Some(SolverResp::Pong) => {}
        None => println!("solver thread is gone"),
    }
}

/// When few candidates remain the full ranking is cheap, so show it.
fn print_top_candidates(candidates: &[String]) {
    let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
    match top_guesses(&refs, &refs, None, DEFAULT_TOP_GUESSES) {
        Ok(top) => {
            println!("remaining candidates by entropy:");
            for sc in top {
                println!("  {} {:.3}", sc.word, sc.score);
            }
        }
        Err(err) => println!("ranking failed: {}", err),
    }
}

fn print_history(history: &[(String, Colorings)]) {
    for (guess, pattern) in history {
        println!("  {} {}", guess, pattern);
    }
}

/// Reads the recommendation cached by gen_first_guess, if it was produced today.
fn read_cached_first_guess(key: &str) -> Option<(String, WordleFloat)> {
    let raw =
        std::fs::read_to_string(format!("{}{}", DATA_DIRECTORY, FIRST_GUESS_FILE_NAME)).ok()?;
    let mut parts = raw.split_whitespace();
    if parts.next()? != key {
        log::debug!("first-guess cache is from another day; ignoring");
        return None;
    }

    let word = normalize_wordle_word(parts.next()?);
    if !is_wordle_str(&word) {
        return None;
    }
    let score = parts.next()?.parse().ok()?;
    Some((word, score))
}
