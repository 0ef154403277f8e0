//! Precomputes the default-state recommendation (no guesses made yet) and caches it on disk,
//! keyed by the current UTC day. The first computation is the most expensive one (the candidate
//! set is the entire possible-answer list), so the interactive helper reads this file instead of
//! recomputing when it is fresh.

use std::fs::File;
use std::io::Write;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use wordle_helper::wordle::*;

fn main() {
    env_logger::init();

    let now_unix_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    let key = day_key(now_unix_ms);

    let candidates: Vec<&str> = DATA.possible_words.iter().map(String::as_str).collect();
    let allowed: Vec<&str> = DATA.allowed_guesses.iter().map(String::as_str).collect();
    let past = known_past_answers(&DATA.answers_by_date, now_unix_ms);
    let weights = build_past_answer_weights(&candidates, &past, DEFAULT_PAST_ANSWER_WEIGHT);

    let start_at = Instant::now();
    let rec = best_next_guess(&RecommendOptions::new(&candidates, &allowed).with_weights(&weights))
        .expect("possible word list should not be empty");
    let dur = start_at.elapsed();

    std::fs::create_dir_all(DATA_DIRECTORY).expect("should create data directory");
    let at = format!("{}{}", DATA_DIRECTORY, FIRST_GUESS_FILE_NAME);
    let mut f = File::options()
        .truncate(true)
        .create(true)
        .write(true)
        .open(&at)
        .expect("should open");
    // space separated, matching what read_cached_first_guess expects
    f.write_all(format!("{} {} {}\n", key, rec.word, rec.score).as_bytes())
        .expect("should write OK");

    eprintln!(
        "done! cached '{}' ({:.3} bits) for {} at {} in {:.2}s",
        rec.word,
        rec.score,
        key,
        at,
        dur.as_secs_f64(),
    );
}
