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

use crate::wordle::prelude::*;
use lazy_static::lazy_static;
use rust_embed::RustEmbed;
use std::collections::HashSet;
use std::str::Utf8Error;
use thiserror::Error;

// Stores "derived data" such as the cached default-state recommendation
pub const DATA_DIRECTORY: &str = "data/";
pub const FIRST_GUESS_FILE_NAME: &str = "first_guess.txt";

// embedded word-list data, one word per line
pub const EMBED_DATA_DIRECTORY: &str = "txt_data/";
pub const POSSIBLE_WORDS_FILE_NAME: &str = "possible_words.txt";
pub const ALLOWED_WORDS_FILE_NAME: &str = "allowed_words.txt";
pub const ANSWERS_BY_DATE_FILE_NAME: &str = "answers_by_date.txt";

lazy_static! {
    pub static ref DATA: Data = Data::read().expect("should have no failures reading data...");
}

#[derive(RustEmbed)]
#[folder = "txt_data/"]
struct RawData;

/// Holds all of the data represented by the static/embedded text files
#[derive(Clone, Debug)]
pub struct Data {
    /// The narrower universe of canonical answers (what the puzzle actually picks from)
    pub possible_words: Vec<String>,
    /// The broad universe of words the game will accept as a guess, including probe-only words
    pub allowed_words: Vec<String>,
    /// Known past answers, in play order starting from puzzle #0
    pub answers_by_date: Vec<String>,
    /// allowed_words + any possible_words missing from it, deduplicated, order preserved. This is
    /// the universe the recommendation engine searches.
    pub allowed_guesses: Vec<String>,
}

#[derive(Error, Debug)]
pub enum LoadDataErr {
    #[error("missing data file '{0}'")]
    MissingDataFile(&'static str),
    #[error(transparent)]
    EncodingError(#[from] Utf8Error),
}

impl Data {
    pub fn read() -> Result<Self, LoadDataErr> {
        let possible_words = read_word_list(POSSIBLE_WORDS_FILE_NAME)?;
        let allowed_words = read_word_list(ALLOWED_WORDS_FILE_NAME)?;
        let answers_by_date = read_word_list(ANSWERS_BY_DATE_FILE_NAME)?;
        let allowed_guesses = union_preserving_order(&allowed_words, &possible_words);

        let out = Self {
            possible_words,
            allowed_words,
            answers_by_date,
            allowed_guesses,
        };
        log::debug!(
            "got {} possible words, {} allowed words ({} total guessable), {} dated answers",
            out.possible_words.len(),
            out.allowed_words.len(),
            out.allowed_guesses.len(),
            out.answers_by_date.len(),
        );
        Ok(out)
    }
}

/// Reads a word-list file: one word per line, lines that don't normalize to a wordle_str are
/// dropped silently (comments and blanks, mostly).
fn read_word_list(name: &'static str) -> Result<Vec<String>, LoadDataErr> {
    Ok(retrieve_file_as_str(name)?
        .ok_or(LoadDataErr::MissingDataFile(name))?
        .lines()
        .map(normalize_wordle_word)
        .filter(|line| is_wordle_str(line))
        .collect())
}

/// first ++ (second - first), keeping the order words first appear in
fn union_preserving_order(first: &[String], second: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(first.len() + second.len());
    let mut out = Vec::with_capacity(first.len() + second.len());
    for w in first.iter().chain(second.iter()) {
        if seen.insert(w.as_str()) {
            out.push(w.clone());
        }
    }
    out
}

fn retrieve_file_as_str(name: &str) -> Result<Option<String>, LoadDataErr> {
    let f: rust_embed::EmbeddedFile = match RawData::get(name) {
        Some(data) => data,
        None => {
            // fall back to reading from disk, so the data can be edited without rebuilding
            if let Ok(mut f) = std::fs::File::open(format!("{}{}", EMBED_DATA_DIRECTORY, name)) {
                let mut out = String::default();
                if std::io::Read::read_to_string(&mut f, &mut out).is_ok() {
                    return Ok(Some(out));
                }
            }

            return Ok(None);
        }
    };

    Ok(Some(
        std::str::from_utf8(&f.data)
            .map_err(LoadDataErr::EncodingError)?
            .to_string(),
    ))
}
