//! Game aggregate: one secret, its pool, and the guesses made against it.

use chrono::{DateTime, Utc};

use crate::domain::clock::Clock;
use crate::domain::entities::Guess;
use crate::domain::ids::{ExternalKey, GameId};
use crate::domain::pool::Pool;
use crate::domain::scoring;
use crate::error::AppError;
use crate::utils::random::RandomSource;

/// Shortest allowed code.
pub const MIN_CODE_LENGTH: usize = 1;
/// Longest allowed code.
pub const MAX_CODE_LENGTH: usize = 20;

const LENGTH_PROPERTY: &str = "length";
const TEXT_PROPERTY: &str = "text";

/// Lifecycle state of a [`Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Zero or more non-solving guesses recorded.
    Active,
    /// A guess matched every position. Terminal.
    Solved,
}

/// Input data for creating a new game.
///
/// When `text` is `None` a secret is drawn at random from the pool.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub pool: String,
    pub length: usize,
    pub text: Option<String>,
}

impl NewGame {
    pub fn new(pool: impl Into<String>, length: usize) -> Self {
        Self {
            pool: pool.into(),
            length,
            text: None,
        }
    }

    /// Uses a caller-chosen secret instead of a random one.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// The game aggregate root.
///
/// Owns an append-only guess history. Once any recorded guess is a solution
/// the game is [`GameState::Solved`] and rejects further guesses.
///
/// Not safe for concurrent mutation; callers serialize writers per game.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    external_key: ExternalKey,
    created: DateTime<Utc>,
    pool: Pool,
    secret: Vec<char>,
    guesses: Vec<Guess>,
}

impl Game {
    /// Validates `new_game` and builds a fresh, unsolved game.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `length` is outside `1..=20` (property `length`)
    /// - the pool is invalid (property `pool`, see [`Pool::parse`])
    /// - a supplied secret has the wrong length or symbols outside the pool
    ///   (property `text`)
    pub fn create(
        new_game: NewGame,
        rng: &dyn RandomSource,
        clock: &dyn Clock,
    ) -> Result<Self, AppError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&new_game.length) {
            return Err(AppError::invalid_property(
                LENGTH_PROPERTY,
                format!("must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH}"),
            ));
        }

        let pool = Pool::parse(&new_game.pool)?;

        let secret = match new_game.text {
            Some(text) => {
                let symbols: Vec<char> = text.chars().collect();
                validate_symbols(&pool, new_game.length, &symbols)?;
                symbols
            }
            None => pool.generate_secret(new_game.length, rng),
        };

        Ok(Self {
            id: GameId::new(),
            external_key: ExternalKey::new(),
            created: clock.now(),
            pool,
            secret,
            guesses: Vec::new(),
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn external_key(&self) -> ExternalKey {
        self.external_key
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn length(&self) -> usize {
        self.secret.len()
    }

    /// Guesses in submission order, oldest first.
    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    pub fn find_guess(&self, key: ExternalKey) -> Option<&Guess> {
        self.guesses.iter().find(|g| g.external_key() == key)
    }

    pub fn state(&self) -> GameState {
        if self.guesses.iter().any(Guess::is_solution) {
            GameState::Solved
        } else {
            GameState::Active
        }
    }

    pub fn is_solved(&self) -> bool {
        self.state() == GameState::Solved
    }

    /// Returns the secret once the game is solved, and `None` before that.
    pub fn reveal_secret(&self) -> Option<String> {
        self.is_solved().then(|| self.secret.iter().collect())
    }

    /// Validates, scores and records a guess.
    ///
    /// On error the guess history is left untouched.
    ///
    /// # Errors
    ///
    /// - [`AppError::AlreadySolved`] if the game is solved
    /// - [`AppError::Validation`] on `text` if it contains a symbol outside the
    ///   pool, or if its length differs from the code length
    pub fn submit_guess(&mut self, text: &str, clock: &dyn Clock) -> Result<Guess, AppError> {
        if self.is_solved() {
            return Err(AppError::AlreadySolved);
        }

        let symbols: Vec<char> = text.chars().collect();
        validate_symbols(&self.pool, self.length(), &symbols)?;

        let score = scoring::score(&self.secret, &symbols);
        let guess = Guess::new(clock.now(), symbols, score);
        self.guesses.push(guess.clone());

        Ok(guess)
    }

    /// A game is stale when it was created before `cutoff` and no guess was
    /// recorded after it. A guess made exactly at `cutoff` does not keep the
    /// game alive.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.created < cutoff && !self.guesses.iter().any(|guess| guess.created() > cutoff)
    }
}

fn validate_symbols(pool: &Pool, length: usize, symbols: &[char]) -> Result<(), AppError> {
    if symbols.iter().any(|&c| !pool.contains(c)) {
        return Err(AppError::invalid_property(
            TEXT_PROPERTY,
            format!("must contain no characters other than \"{pool}\""),
        ));
    }
    if symbols.len() != length {
        return Err(AppError::invalid_property(
            TEXT_PROPERTY,
            format!("must have a length exactly equal to the code length ({length} characters)"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::{FixedClock, SystemClock};
    use crate::utils::random::SeededRandom;
    use chrono::Duration;

    fn game(pool: &str, secret: &str) -> Game {
        Game::create(
            NewGame::new(pool, secret.chars().count()).with_text(secret),
            &SeededRandom::new(0),
            &SystemClock,
        )
        .unwrap()
    }

    #[test]
    fn test_create_generates_secret() {
        let game = Game::create(
            NewGame::new("AAABBC", 6),
            &SeededRandom::new(3),
            &SystemClock,
        )
        .unwrap();

        assert_eq!(game.pool().to_string(), "ABC");
        assert_eq!(game.length(), 6);
        assert_eq!(game.state(), GameState::Active);
        assert!(game.guesses().is_empty());
        assert!(game.reveal_secret().is_none());
    }

    #[test]
    fn test_create_rejects_length_out_of_range() {
        for length in [0, 21] {
            let err = Game::create(NewGame::new("ABC", length), &SeededRandom::new(0), &SystemClock)
                .unwrap_err();
            assert_eq!(err.property(), Some("length"));
        }
    }

    #[test]
    fn test_create_rejects_invalid_pool() {
        let err = Game::create(NewGame::new("AB C", 4), &SeededRandom::new(0), &SystemClock)
            .unwrap_err();
        assert_eq!(err.property(), Some("pool"));
    }

    #[test]
    fn test_create_rejects_bad_supplied_secret() {
        let rng = SeededRandom::new(0);
        let err = Game::create(NewGame::new("ABC", 3).with_text("ABD"), &rng, &SystemClock)
            .unwrap_err();
        assert_eq!(err.property(), Some("text"));

        let err = Game::create(NewGame::new("ABC", 3).with_text("AB"), &rng, &SystemClock)
            .unwrap_err();
        assert_eq!(err.property(), Some("text"));
    }

    #[test]
    fn test_submit_guess_scores_and_appends() {
        let mut game = game("ABCDEF", "ABACAB");

        let guess = game.submit_guess("AABBCC", &SystemClock).unwrap();
        assert_eq!(guess.exact_matches(), 1);
        assert_eq!(guess.near_matches(), 4);
        assert!(!guess.is_solution());

        assert_eq!(game.guess_count(), 1);
        assert!(!game.is_solved());
    }

    #[test]
    fn test_solving_transitions_and_rejects_further_guesses() {
        let mut game = game("ABCDEF", "ABACAB");
        game.submit_guess("FFFFFF", &SystemClock).unwrap();

        let guess = game.submit_guess("ABACAB", &SystemClock).unwrap();
        assert!(guess.is_solution());
        assert_eq!(game.state(), GameState::Solved);
        assert_eq!(game.reveal_secret().as_deref(), Some("ABACAB"));

        let err = game.submit_guess("ABACAB", &SystemClock).unwrap_err();
        assert!(matches!(err, AppError::AlreadySolved));
        assert_eq!(game.guess_count(), 2);
    }

    #[test]
    fn test_guess_with_foreign_symbol_rejected() {
        let mut game = game("ABCD", "ABCD");
        let err = game.submit_guess("ABCX", &SystemClock).unwrap_err();

        assert_eq!(err.property(), Some("text"));
        assert!(err.to_string().contains("no characters other than \"ABCD\""));
        assert!(game.guesses().is_empty());
    }

    #[test]
    fn test_guess_with_wrong_length_rejected() {
        let mut game = game("ABCD", "ABCD");
        let err = game.submit_guess("ABC", &SystemClock).unwrap_err();

        assert_eq!(err.property(), Some("text"));
        assert!(err.to_string().contains("(4 characters)"));
        assert!(game.guesses().is_empty());
    }

    #[test]
    fn test_guess_length_counts_code_points() {
        let mut game = game("🦀🐍", "🦀🐍");
        let guess = game.submit_guess("🐍🦀", &SystemClock).unwrap();
        assert_eq!(guess.near_matches(), 2);
    }

    #[test]
    fn test_history_is_oldest_first() {
        let mut game = game("AB", "AB");
        game.submit_guess("AA", &SystemClock).unwrap();
        game.submit_guess("BB", &SystemClock).unwrap();

        let texts: Vec<String> = game.guesses().iter().map(Guess::text).collect();
        assert_eq!(texts, vec!["AA", "BB"]);

        let key = game.guesses()[1].external_key();
        assert_eq!(game.find_guess(key).unwrap().text(), "BB");
        assert!(game.find_guess(ExternalKey::new()).is_none());
    }

    #[test]
    fn test_staleness_tracks_latest_guess() {
        let start = Utc::now() - Duration::days(10);
        let mut game = Game::create(
            NewGame::new("AB", 2).with_text("AB"),
            &SeededRandom::new(0),
            &FixedClock(start),
        )
        .unwrap();

        let cutoff = Utc::now() - Duration::days(5);
        assert!(game.is_stale(cutoff));

        game.submit_guess("BA", &FixedClock(Utc::now())).unwrap();
        assert!(!game.is_stale(cutoff));
    }

    #[test]
    fn test_guess_exactly_at_cutoff_is_stale() {
        let start = Utc::now() - Duration::days(10);
        let cutoff = start + Duration::days(3);
        let mut game = Game::create(
            NewGame::new("AB", 2).with_text("AB"),
            &SeededRandom::new(0),
            &FixedClock(start),
        )
        .unwrap();

        game.submit_guess("BA", &FixedClock(cutoff)).unwrap();
        assert!(game.is_stale(cutoff));
        assert!(!game.is_stale(cutoff - Duration::seconds(1)));

        // Creation exactly at the cutoff is not before it.
        assert!(!game.is_stale(start));
    }
}
