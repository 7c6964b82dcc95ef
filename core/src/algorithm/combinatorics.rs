//! Counting words over a bounded multiset of letters
//!
//! A word of length `k` is determined by how many times each letter is used
//! (a selection `c_1 + ... + c_m = k` with `c_i <= max_i`) and by an ordering
//! of those letters, of which there are `k! / (c_1! ... c_m!)`. The total is
//! the sum of that multinomial over every admissible selection.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::AlgorithmError;

/// Letters with the maximum number of times each may be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterMultiset {
    letters: Vec<(char, usize)>,
}

impl LetterMultiset {
    pub fn new(letters: Vec<(char, usize)>) -> Result<Self, AlgorithmError> {
        for (i, (letter, _)) in letters.iter().enumerate() {
            if letters[..i].iter().any(|(other, _)| other == letter) {
                return Err(AlgorithmError::InvalidParameter {
                    name: "letters".into(),
                    reason: format!("letter {letter:?} listed twice"),
                });
            }
        }
        Ok(Self { letters })
    }

    /// Multiplicities as they occur in `word`, letters in first-seen order
    pub fn from_word(word: &str) -> Self {
        let mut letters: Vec<(char, usize)> = Vec::new();
        for ch in word.chars() {
            match letters.iter_mut().find(|(letter, _)| *letter == ch) {
                Some((_, count)) => *count += 1,
                None => letters.push((ch, 1)),
            }
        }
        Self { letters }
    }

    pub fn letters(&self) -> &[(char, usize)] {
        &self.letters
    }

    /// Total number of letter copies available
    pub fn total(&self) -> usize {
        self.letters.iter().map(|(_, n)| n).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementCount {
    pub length: usize,
    /// Distinct letter selections (multisets) of the requested length
    pub selections: u64,
    /// Distinct words of the requested length
    pub arrangements: u128,
}

/// Pascal triangle rows `0..=k`, columns `0..=width`
///
/// `None` marks coefficients past `u128`.
fn binomials(k: usize, width: usize) -> Vec<Vec<Option<u128>>> {
    let mut rows: Vec<Vec<Option<u128>>> = Vec::with_capacity(k + 1);
    for n in 0..=k {
        let row = (0..=n.min(width))
            .map(|j| {
                if j == 0 || j == n {
                    return Some(1);
                }
                let above = &rows[n - 1];
                above[j - 1]?.checked_add(above[j]?)
            })
            .collect();
        rows.push(row);
    }
    rows
}

fn overflow() -> AlgorithmError {
    AlgorithmError::ResourceExhausted("arrangement count overflowed 128 bits".into())
}

/// Depth-first walk over selections
///
/// The multinomial of a selection is built letter by letter as the product
/// of `C(placed + used, used)`. A factor is only taken once the branch can
/// still be completed, so every partial product divides a word count that
/// is part of the total, and an overflow there means the total overflows.
struct Walk<'a> {
    bounds: &'a [usize],
    /// `capacity[i]` = sum of `bounds[i..]`
    capacity: Vec<usize>,
    binomials: Vec<Vec<Option<u128>>>,
    selections: u64,
    arrangements: u128,
}

impl Walk<'_> {
    fn visit(
        &mut self,
        letter: usize,
        remaining: usize,
        placed: usize,
        words: u128,
    ) -> Result<(), AlgorithmError> {
        if letter == self.bounds.len() {
            // remaining == 0 here since capacity past the end is zero
            self.selections += 1;
            self.arrangements = self.arrangements.checked_add(words).ok_or_else(overflow)?;
            return Ok(());
        }
        for used in 0..=self.bounds[letter].min(remaining) {
            if remaining - used > self.capacity[letter + 1] {
                continue;
            }
            let factor = self.binomials[placed + used][used].ok_or_else(overflow)?;
            let words = words.checked_mul(factor).ok_or_else(overflow)?;
            self.visit(letter + 1, remaining - used, placed + used, words)?;
        }
        Ok(())
    }
}

/// Counts the distinct words of length `k` spelled from `multiset`
///
/// Fails with `ResourceExhausted` only when the count itself exceeds `u128`.
pub fn count_arrangements(
    multiset: &LetterMultiset,
    k: usize,
) -> Result<ArrangementCount, AlgorithmError> {
    let bounds: Vec<usize> = multiset.letters.iter().map(|&(_, n)| n).collect();
    let mut capacity = vec![0usize; bounds.len() + 1];
    for i in (0..bounds.len()).rev() {
        capacity[i] = capacity[i + 1] + bounds[i];
    }

    if k > capacity[0] {
        return Ok(ArrangementCount {
            length: k,
            selections: 0,
            arrangements: 0,
        });
    }

    let mut walk = Walk {
        bounds: &bounds,
        capacity,
        binomials: binomials(k, bounds.iter().copied().max().unwrap_or(0)),
        selections: 0,
        arrangements: 0,
    };
    walk.visit(0, k, 0, 1)?;

    debug!(
        "length {k} over {} letters: {} selections, {} words",
        bounds.len(),
        walk.selections,
        walk.arrangements
    );
    Ok(ArrangementCount {
        length: k,
        selections: walk.selections,
        arrangements: walk.arrangements,
    })
}
