//! Guess scoring.
//!
//! A guess is compared position by position against the secret. Positions
//! that agree are exact matches and are consumed. Among the remaining
//! positions, every guess symbol that can be paired with a distinct unconsumed
//! secret symbol of the same value is a near match.
//!
//! Two strategies are provided and must always agree:
//!
//! - [`score`] - residual frequency counts reconciled with `min` per symbol
//! - [`score_by_elimination`] - explicit consumption of secret positions

use std::collections::HashMap;

use serde::Serialize;

/// Outcome of comparing one guess against a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Score {
    pub exact_matches: usize,
    pub near_matches: usize,
}

impl Score {
    pub fn new(exact_matches: usize, near_matches: usize) -> Self {
        Self {
            exact_matches,
            near_matches,
        }
    }

    /// Returns true if every position of a code of `length` symbols matched.
    pub fn is_solution(&self, length: usize) -> bool {
        self.exact_matches == length
    }
}

/// Scores `guess` against `secret` using residual symbol counts.
///
/// Both slices must have the same length; checking that is the caller's job.
pub fn score(secret: &[char], guess: &[char]) -> Score {
    debug_assert_eq!(secret.len(), guess.len());

    let mut exact_matches = 0;
    let mut secret_residual: HashMap<char, usize> = HashMap::new();
    let mut guess_residual: HashMap<char, usize> = HashMap::new();

    for (&s, &g) in secret.iter().zip(guess) {
        if s == g {
            exact_matches += 1;
        } else {
            *secret_residual.entry(s).or_default() += 1;
            *guess_residual.entry(g).or_default() += 1;
        }
    }

    let near_matches = guess_residual
        .iter()
        .map(|(symbol, &count)| count.min(secret_residual.get(symbol).copied().unwrap_or(0)))
        .sum();

    Score::new(exact_matches, near_matches)
}

/// Scores `guess` against `secret` by consuming matched secret positions.
///
/// Quadratic in the code length, which is at most 20.
pub fn score_by_elimination(secret: &[char], guess: &[char]) -> Score {
    debug_assert_eq!(secret.len(), guess.len());

    let mut remaining: Vec<Option<char>> = secret.iter().copied().map(Some).collect();
    let mut unmatched = Vec::with_capacity(guess.len());
    let mut exact_matches = 0;

    for (slot, &g) in remaining.iter_mut().zip(guess) {
        if *slot == Some(g) {
            exact_matches += 1;
            *slot = None;
        } else {
            unmatched.push(g);
        }
    }

    let mut near_matches = 0;
    for g in unmatched {
        if let Some(slot) = remaining.iter_mut().find(|slot| **slot == Some(g)) {
            near_matches += 1;
            *slot = None;
        }
    }

    Score::new(exact_matches, near_matches)
}
