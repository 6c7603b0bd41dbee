//! Guess entity: one scored attempt at a game's secret.

use chrono::{DateTime, Utc};

use crate::domain::ids::{ExternalKey, GuessId};
use crate::domain::scoring::Score;

/// An immutable, already scored guess.
///
/// Guesses are only created by [`crate::domain::entities::Game::submit_guess`];
/// fields are private so a recorded score can never be edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    id: GuessId,
    external_key: ExternalKey,
    created: DateTime<Utc>,
    text: Vec<char>,
    score: Score,
    length: usize,
}

impl Guess {
    pub(crate) fn new(created: DateTime<Utc>, text: Vec<char>, score: Score) -> Self {
        let length = text.len();
        Self {
            id: GuessId::new(),
            external_key: ExternalKey::new(),
            created,
            text,
            score,
            length,
        }
    }

    pub fn id(&self) -> GuessId {
        self.id
    }

    pub fn external_key(&self) -> ExternalKey {
        self.external_key
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn symbols(&self) -> &[char] {
        &self.text
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn exact_matches(&self) -> usize {
        self.score.exact_matches
    }

    pub fn near_matches(&self) -> usize {
        self.score.near_matches
    }

    /// True when every position matched the secret.
    pub fn is_solution(&self) -> bool {
        self.score.is_solution(self.length)
    }
}
