// This file configures the constants that define the game of wordle.
//
// It is unlikely you will ever change WORD_SIZE, but if you want to, most of this implementation
// should support it.

// how many characters are in a wordle answer?
pub const WORD_SIZE: usize = 5;
// how many letters are in the english alphabet? (don't change this lol)
pub const ALPHABET_SIZE: usize = (('z' as usize) - ('a' as usize)) + 1;

// This type allows you to switch between using f64 for all calculations and f32 if you so desire.
pub type WordleFloat = f64;

pub use crate::util::*;

/// Returns the index of the given letter within the alphabet (like 'a' = 0, 'b' = 1, etc...)
pub fn letter_idx(letter: u8) -> usize {
    ((letter as isize) - ('a' as isize)) as usize
}

/// Checks whether or not the passed string meets the constraints of a "wordle_str"
/// must be (5 letters, all lowercase)
pub fn is_wordle_str(v: &str) -> bool {
    is_wordle_str_bytes(v.as_bytes())
}

/// Checks whether or not the passed bytes represent an ASCII sequence which is also a "wordle_str"
pub fn is_wordle_str_bytes(v: &[u8]) -> bool {
    v.len() == WORD_SIZE && v.iter().all(is_normal_wordle_char)
}

/// Given some input &str, try to clean it up such that it might be a wordle_str.
///
/// This function does not trim the length of a word or remove non alpha characters. It simply
/// cleans up words that are already valid wordle words by removing any spacing and converting
/// to all lowercase.
///
/// You should always verify that the output of this function passes is_wordle_str.
pub fn normalize_wordle_word(str: &str) -> String {
    str.trim().to_lowercase()
}

/// Verifies that a byte represents a lowercase alphabetic character (a valid wordle_str char)
pub fn is_normal_wordle_char(v: &u8) -> bool {
    v.is_ascii_lowercase()
}
