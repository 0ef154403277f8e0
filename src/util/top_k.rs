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

use std::iter::FusedIterator;
use std::ops::Range;

///
/// Selects the K highest-scored items from an iterator without sorting the whole input.
///
/// K is a runtime value because callers (such as top_guesses) take the limit as a parameter.
/// Items with equal scores keep their first-encountered order: an incoming item only displaces
/// an existing one when its score is strictly greater.
///
pub struct TopK<E> {
    items: Vec<Option<E>>,
    alive: Range<usize>,
}

impl<Element> TopK<Element> {
    pub fn new<Itr, Score, ScoringFunc>(iter: Itr, k: usize, f: ScoringFunc) -> Self
    where
        Itr: Iterator<Item = Element>,
        ScoringFunc: Fn(&Element) -> Score,
        Score: PartialOrd<Score>,
    {
        // these two vecs are coordinated such that if scores[x].is_some() then items[x].is_some()
        // scores[x] is f(&items[x])
        let mut items: Vec<Option<Element>> = (0..k).map(|_| None).collect();
        let mut scores: Vec<Option<Score>> = (0..k).map(|_| None).collect();
        let mut size = 0;

        // exhaust the iterator (look at every item)
        for next in iter {
            // compute score
            let score = f(&next);

            // find if the score is larger than anything in our vec currently
            for i in 0..k {
                // we should insert if we are strictly larger OR if the slot is available
                if if let Some(other) = &scores[i] {
                    other < &score
                } else {
                    true
                } {
                    // insert score and item, shifting everything below down one slot
                    shift_insert(&mut scores, Some(score), i);
                    shift_insert(&mut items, Some(next), i);

                    // ensure size is correct
                    if size < k {
                        size += 1;
                    }

                    // this break combined with the structure of this loop ensures that
                    // the vecs are always sorted from greatest -> least score value
                    break;
                }
            }
        }

        Self {
            items,
            alive: 0..size,
        }
    }
}

impl<Element> Iterator for TopK<Element> {
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.alive.next().and_then(|idx| self.items[idx].take())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.alive.end))
    }
}

impl<Element> FusedIterator for TopK<Element> {}

#[inline]
fn shift_insert<E>(elems: &mut [E], mut tmp: E, idx: usize) {
    #[allow(clippy::needless_range_loop)]
    for i in idx..elems.len() {
        std::mem::swap(&mut tmp, &mut elems[i]);
    }
}

pub trait TopKExt: Iterator + Sized {
    fn top_k<Score, ScoreFn>(self, k: usize, score_f: ScoreFn) -> TopK<Self::Item>
    where
        ScoreFn: Fn(&Self::Item) -> Score,
        Score: PartialOrd<Score>,
    {
        TopK::new(self, k, score_f)
    }
}

impl<I> TopKExt for I where I: Iterator + Sized {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_highest_descending() {
        let data = [3, 9, 1, 7, 5];
        let out: Vec<i32> = data.iter().copied().top_k(3, |v| *v).collect();
        assert_eq!(out, vec![9, 7, 5]);
    }

    #[test]
    fn test_fewer_items_than_k() {
        let data = [2, 8];
        let out: Vec<i32> = data.iter().copied().top_k(5, |v| *v).collect();
        assert_eq!(out, vec![8, 2]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let data = [("a", 1.0), ("b", 2.0), ("c", 2.0), ("d", 1.0)];
        let out: Vec<&str> = data
            .iter()
            .copied()
            .top_k(4, |(_, s)| *s)
            .map(|(w, _)| w)
            .collect();
        assert_eq!(out, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_zero_k_yields_nothing() {
        let data = [1, 2, 3];
        assert_eq!(data.iter().copied().top_k(0, |v| *v).count(), 0);
    }
}
