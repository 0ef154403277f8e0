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

use self::Coloring::*;
use super::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
#[cfg(test)]
use std::iter::FusedIterator;
use std::ops::{Index, IndexMut};

///
/// Any set of colorings can be converted to a "code" which uniquely identifies that specific
/// coloring. This type is the number we use to store that code (and we pick u8 because the range is
/// 0 -> 3^5=243 for 3 colorings in a 5 letter puzzle).
///
pub type ColoringCode = u8;

///
/// The three different colors that a wordle square can be...
///   * Excluded = the letter is not in the answer (also indicates no further instances of a letter
///                when another square with the same letter is colored misplaced/correct)
///   * Misplaced = the letter is in the answer, but not in this position
///   * Correct = the letter is in the answer at this position
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coloring {
    Excluded,
    Misplaced,
    Correct,
}

impl Coloring {
    /// All three colorings (make sure this actually matches the definition above)
    pub const ALL: [Coloring; 3] = [Excluded, Misplaced, Correct];
    /// The number of possible colorings
    pub const NUM: usize = Self::ALL.len();

    /// Converts the coloring to a number (0, 1, or 2)
    pub fn ordinal(&self) -> ColoringCode {
        match self {
            Excluded => 0,
            Misplaced => 1,
            Correct => 2,
        }
    }

    /// Converts a number (usually from .ordinal()) back to a Coloring
    pub fn from_ordinal(code: ColoringCode) -> Option<Self> {
        Some(match code {
            0 => Excluded,
            1 => Misplaced,
            2 => Correct,
            _ => return None,
        })
    }

    /// The single-letter form used when colorings are typed or displayed as text ('B', 'Y', 'G')
    pub fn letter(&self) -> char {
        match self {
            Excluded => 'B',
            Misplaced => 'Y',
            Correct => 'G',
        }
    }

    /// Parses the single-letter form, case-insensitively
    pub fn from_letter(c: char) -> Option<Self> {
        Some(match c.to_ascii_uppercase() {
            'B' => Excluded,
            'Y' => Misplaced,
            'G' => Correct,
            _ => return None,
        })
    }
}

/// An array of Colorings, one for each square in the puzzle.
pub type ColoringsArray = [Coloring; WORD_SIZE];

/// The array of Colorings, but in a struct, so that we can attach some useful functions to a
/// complete set of Colorings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Colorings(pub ColoringsArray);

/// Automatic conversion of [Coloring; WORD_SIZE] -> Colorings
impl From<ColoringsArray> for Colorings {
    fn from(arr: ColoringsArray) -> Self {
        Self(arr)
    }
}

/// Delegate indexing of the struct to it's inner value
impl Index<usize> for Colorings {
    type Output = Coloring;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Delegate mutable indexing of the struct to it's inner value
impl IndexMut<usize> for Colorings {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Colorings {
    /// How many different possible colorings are there? In the case of a 5 word puzzle with 3
    /// colorings it's 3^5=243 possible colorings
    pub const NUM_STATES: usize = Coloring::NUM.pow(WORD_SIZE as u32);

    ///
    /// Compute what colors would be shown given some guess & answer. For example if the guess was
    /// "tares" and the answer was "scare" we should compute [Excluded, Misplaced, Misplaced, Misplaced, Misplaced]
    ///
    /// This is the two-pass rule used by the official game, and the pass order matters for
    /// repeated letters:
    /// * GREEN pass marks correctly positioned letters; every non-green answer letter adds to a
    ///   per-letter "remaining" counter (greens never contribute to the counters)
    /// * YELLOW pass walks the guess left to right, marking a letter misplaced only while its
    ///   remaining counter is positive, so earlier duplicates in the guess win the yellow
    ///
    /// Inputs must already be normalized wordle strs; use [super::feedback] for the validating
    /// entry point.
    ///
    pub fn with_guess_answer(guess: &str, answer: &str) -> Self {
        debug_assert!(is_wordle_str(answer));
        debug_assert!(is_wordle_str(guess));

        let mut out = Self::default();
        let mut remaining = [0usize; ALPHABET_SIZE];
        let answer_bytes = answer.as_bytes();
        let guess_bytes = guess.as_bytes();

        // GREEN pass
        for i in 0..WORD_SIZE {
            let gc = guess_bytes[i];
            let ac = answer_bytes[i];

            if gc == ac {
                out[i] = Correct;
            } else {
                remaining[letter_idx(ac)] += 1;
            }
        }

        // YELLOW pass
        for i in 0..WORD_SIZE {
            if out[i] != Correct {
                let counter = &mut remaining[letter_idx(guess_bytes[i])];
                if *counter > 0 {
                    *counter -= 1;
                    out[i] = Misplaced;
                }
            }
        }

        out
    }

    ///
    /// Computes a code that uniquely identifies this particular coloring. These codes are numbers in
    /// [0, 243) (in the case of a 5 letter puzzle).
    ///
    /// We essentially treat the colorings as a 5 digit base-3 number. Each Coloring has an ordinal()
    /// which ranges from [0, 3), and the left-most color is digit 0, next digit 1, etc.
    ///
    /// This is useful because the entropy scorer wants one bucket for each possible coloring, and
    /// using to_code() we can convert a Coloring to an array index. The alternative (using a
    /// HashMap<Colorings, _>) requires implementing and calculating a Hash, allocating on the heap,
    /// etc. We avoid this and stay on the stack using static sized arrays indexed by Colorings.to_code()
    ///
    pub fn to_code(&self) -> ColoringCode {
        let mut out = 0;
        let mut multiplier = 1;
        for i in 0..WORD_SIZE {
            out += self[i].ordinal() * multiplier;
            multiplier *= Coloring::NUM as u8;
        }
        out
    }

    ///
    /// Converts a ColoringCode back to Colorings.
    ///
    /// This works by treating the code as a base-3 number, and the code is basically identical to
    /// any digit-by-digit processing you've written before.
    ///
    pub fn from_code(mut code: ColoringCode) -> Option<Self> {
        let mut out = Self::default();
        for i in 0..WORD_SIZE {
            out[i] = Coloring::from_ordinal(code % (Coloring::NUM as u8))?;
            code /= Coloring::NUM as u8;
        }

        Some(out)
    }

    ///
    /// Parses the textual form of a coloring, such as "BYBGG". This is how users type feedback in,
    /// so parsing is case-insensitive. Returns None unless the input is exactly WORD_SIZE symbols,
    /// each one of B/Y/G.
    ///
    pub fn from_pattern_str(s: &str) -> Option<Self> {
        let mut out = Self::default();
        let mut n = 0;
        for (i, c) in s.trim().chars().enumerate() {
            if i >= WORD_SIZE {
                return None;
            }
            out[i] = Coloring::from_letter(c)?;
            n += 1;
        }

        if n == WORD_SIZE {
            Some(out)
        } else {
            None
        }
    }

    #[cfg(test)]
    /// Iterates through all possible [Coloring; 5] configurations
    fn iter_all_possible() -> impl Iterator<Item = Colorings> {
        IterAllColorings::default()
    }
}

///
/// Tests whether an arbitrary string is a syntactically well-formed textual pattern (exactly
/// WORD_SIZE symbols, each in the B/Y/G alphabet).
///
pub fn is_valid_pattern(s: &str) -> bool {
    Colorings::from_pattern_str(s).is_some()
}

impl Default for Colorings {
    fn default() -> Self {
        Self([Excluded; WORD_SIZE])
    }
}

impl Display for Colorings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..WORD_SIZE {
            write!(f, "{}", self[i].letter())?;
        }

        Ok(())
    }
}

#[cfg(test)]
struct IterAllColorings {
    next: Option<Colorings>,
}

#[cfg(test)]
impl Default for IterAllColorings {
    fn default() -> Self {
        Self {
            next: Some(Colorings::default()),
        }
    }
}

#[cfg(test)]
impl Iterator for IterAllColorings {
    type Item = Colorings;

    fn next(&mut self) -> Option<Self::Item> {
        return if let Some(cur) = self.next {
            let mut next = cur;
            // try to increment the right-most color through excluded -> misplaced -> correct,
            // resetting to excluded and carrying left when the right-most is already correct,
            // which walks every possible coloring exactly once
            for k in (0..WORD_SIZE).rev() {
                match next[k] {
                    Excluded => {
                        next[k] = Misplaced;
                        self.next = Some(next);
                        break;
                    }
                    Misplaced => {
                        next[k] = Correct;
                        self.next = Some(next);
                        break;
                    }
                    Correct => {
                        if k == 0 {
                            self.next = None;
                            // implicitly this is break; because 0 is the end
                        } else {
                            next[k] = Excluded;
                        }
                    }
                }
            }

            Some(cur)
        } else {
            None
        };
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (Colorings::NUM_STATES, Some(Colorings::NUM_STATES))
    }
}

#[cfg(test)]
impl ExactSizeIterator for IterAllColorings {}

#[cfg(test)]
impl FusedIterator for IterAllColorings {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_coloring_ordinal_reversible() {
        for c in Coloring::ALL {
            assert_eq!(Some(c), Coloring::from_ordinal(c.ordinal()))
        }
    }

    #[test]
    fn test_colorings_fit_into_code_type() {
        let num_states = Colorings::NUM_STATES;
        let max_code_rep = ColoringCode::MAX as usize;
        assert!(
            num_states < max_code_rep,
            "{} states need to be represented by {} ({}..{})",
            num_states,
            std::any::type_name::<ColoringCode>(),
            ColoringCode::MIN,
            max_code_rep,
        );
    }

    #[test]
    fn test_unique_coding_of_colorings() {
        let mut seen = [false; ColoringCode::MAX as usize];
        let mut total = 0;
        for colorings in Colorings::iter_all_possible() {
            let code = colorings.to_code();
            assert!(
                !seen[code as usize],
                "expected no duplicate codes, got duplicate {}",
                code
            );
            seen[code as usize] = true;
            total += 1;
        }
        assert_eq!(total, Colorings::NUM_STATES);
    }

    #[test]
    fn test_reversible_coding_of_colorings() {
        for colorings in Colorings::iter_all_possible() {
            let code = colorings.to_code();
            assert_eq!(
                Some(colorings),
                Colorings::from_code(code),
                "code {} produced from {:?} should reverse to same colorings",
                code,
                colorings,
            )
        }
    }

    // reference table of known tricky (mostly duplicate-letter) pairs
    #[test_case("abbey", "algae", [Correct, Excluded, Excluded, Misplaced, Excluded])]
    #[test_case("mommy", "mummy", [Correct, Excluded, Correct, Correct, Correct])]
    #[test_case("speed", "erase", [Misplaced, Excluded, Misplaced, Misplaced, Excluded])]
    #[test_case("speed", "steal", [Correct, Excluded, Correct, Excluded, Excluded])]
    #[test_case("crane", "caulk", [Correct, Misplaced, Excluded, Excluded, Excluded])]
    #[test_case("sassy", "brass", [Misplaced, Misplaced, Excluded, Correct, Excluded])]
    #[test_case("banal", "annal", [Excluded, Misplaced, Correct, Correct, Correct])]
    #[test_case("geese", "siege", [Misplaced, Excluded, Correct, Misplaced, Correct])]
    #[test_case("tares", "scare", [Excluded, Misplaced, Misplaced, Misplaced, Misplaced])]
    #[test_case("robot", "troop", [Misplaced, Misplaced, Excluded, Correct, Misplaced])]
    #[test_case("slate", "slate", [Correct, Correct, Correct, Correct, Correct])]
    #[test_case("vivid", "lever", [Excluded, Excluded, Correct, Excluded, Excluded])]
    fn test_coloring(guess: &str, answer: &str, expected_coloring: ColoringsArray) {
        assert_eq!(
            Colorings::with_guess_answer(guess, answer),
            Colorings(expected_coloring),
            "guess={}, answer={}",
            guess,
            answer
        );
    }

    #[test]
    fn test_self_guess_is_all_green() {
        for w in ["crane", "abbey", "mummy", "llama"] {
            assert!(Colorings::with_guess_answer(w, w)
                .0
                .iter()
                .all(|c| c == &Correct));
        }
    }

    #[test_case("BYBGG", Some([Excluded, Misplaced, Excluded, Correct, Correct]))]
    #[test_case("bybgg", Some([Excluded, Misplaced, Excluded, Correct, Correct]) ; "bybgg lowercase")]
    #[test_case(" GGGGG ", Some([Correct; WORD_SIZE]))]
    #[test_case("BBBB", None)]
    #[test_case("BBBBBB", None)]
    #[test_case("BXBGG", None)]
    #[test_case("", None)]
    fn test_pattern_str_parsing(input: &str, expected: Option<ColoringsArray>) {
        assert_eq!(Colorings::from_pattern_str(input), expected.map(Colorings));
        assert_eq!(is_valid_pattern(input), expected.is_some());
    }

    #[test]
    fn test_pattern_str_display_round_trips() {
        for colorings in Colorings::iter_all_possible() {
            let s = colorings.to_string();
            assert_eq!(Colorings::from_pattern_str(&s), Some(colorings));
        }
    }
}
