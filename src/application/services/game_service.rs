//! Game creation, lookup and guess submission service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use super::game_locks::GameLocks;
use crate::domain::clock::Clock;
use crate::domain::entities::{Game, Guess, NewGame};
use crate::domain::ids::ExternalKey;
use crate::domain::repositories::{GameRepository, StatusFilter};
use crate::error::AppError;
use crate::utils::key_codec::KeyCodec;
use crate::utils::random::RandomSource;

/// Result of a recorded guess: the scored guess and the game it was recorded
/// against, as saved.
#[derive(Debug, Clone)]
pub struct GuessOutcome {
    pub game: Game,
    pub guess: Guess,
}

/// Service for creating games and recording guesses against them.
///
/// All collaborators are injected: the repository stores aggregates, the
/// codec translates external keys at this boundary, the random source draws
/// secrets and the clock stamps new entities.
pub struct GameService<R: GameRepository> {
    repository: Arc<R>,
    codec: Arc<dyn KeyCodec>,
    rng: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    locks: GameLocks,
}

impl<R: GameRepository> GameService<R> {
    /// Creates a new game service.
    pub fn new(
        repository: Arc<R>,
        codec: Arc<dyn KeyCodec>,
        rng: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            codec,
            rng,
            clock,
            locks: GameLocks::new(),
        }
    }

    /// Per-game locks; hand these to any other service that deletes games.
    pub fn locks(&self) -> &GameLocks {
        &self.locks
    }

    pub fn codec(&self) -> &dyn KeyCodec {
        self.codec.as_ref()
    }

    /// Encodes an external key for display.
    pub fn encode_key(&self, key: ExternalKey) -> String {
        self.codec.encode(key.to_uuid())
    }

    /// Validates `new_game`, generates a secret if none was supplied, and
    /// stores the new game.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid pool, length or
    /// supplied secret. Nothing is stored in that case.
    pub async fn create(&self, new_game: NewGame) -> Result<Game, AppError> {
        let game = Game::create(new_game, self.rng.as_ref(), self.clock.as_ref()).inspect_err(
            |e| warn!(error = %e, "rejected new game"),
        )?;

        let game = self.repository.save(game).await?;

        metrics::counter!("codebreaker_games_created_total").increment(1);
        info!(
            game_id = %game.id(),
            pool_size = game.pool().len(),
            length = game.length(),
            "game created"
        );

        Ok(game)
    }

    /// Retrieves a game by its encoded external key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key is malformed or no game has it.
    pub async fn get(&self, key: &str) -> Result<Game, AppError> {
        let external_key = self.resolve_key(key, "Game not found")?;
        self.find(external_key, key).await
    }

    /// Lists games matching `filter`, most recent first.
    pub async fn list(&self, filter: StatusFilter) -> Result<Vec<Game>, AppError> {
        self.repository.list_by_created_desc(filter).await
    }

    /// Removes the game with the given key.
    ///
    /// Waits for any guess in flight against the game to be saved first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the game does not exist.
    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        let external_key = self.resolve_key(key, "Game not found")?;
        let _lock = self.locks.lock(external_key).await;

        let game = self.find(external_key, key).await?;
        if !self.repository.delete(&game).await? {
            return Err(AppError::not_found("Game not found", json!({ "id": key })));
        }
        info!(game_id = %game.id(), "game removed");
        Ok(())
    }

    /// Removes every game. Returns how many were removed.
    ///
    /// Each game is deleted under its own lock, so a guess in flight is never
    /// saved back over a deletion.
    pub async fn clear(&self) -> Result<usize, AppError> {
        let games = self.repository.list_by_created_desc(StatusFilter::All).await?;

        let mut removed = 0;
        for game in &games {
            let _lock = self.locks.lock(game.external_key()).await;
            if self.repository.delete(game).await? {
                removed += 1;
            }
        }

        info!(removed, "all games removed");
        Ok(removed)
    }

    /// Validates, scores and records a guess against the game with `game_key`.
    ///
    /// Shorthand for [`Self::record_guess`] when only the guess is needed.
    ///
    /// # Errors
    ///
    /// See [`Self::record_guess`].
    pub async fn submit_guess(&self, game_key: &str, text: &str) -> Result<Guess, AppError> {
        Ok(self.record_guess(game_key, text).await?.guess)
    }

    /// Validates, scores and records a guess, returning it with the updated
    /// game exactly as it was saved.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the game does not exist
    /// - [`AppError::AlreadySolved`] if the game is already solved
    /// - [`AppError::Validation`] if the guess text is invalid
    ///
    /// The stored game is unchanged when any error is returned.
    pub async fn record_guess(
        &self,
        game_key: &str,
        text: &str,
    ) -> Result<GuessOutcome, AppError> {
        let external_key = self.resolve_key(game_key, "Game not found")?;
        let _lock = self.locks.lock(external_key).await;
        self.apply_guess(external_key, game_key, text).await
    }

    async fn apply_guess(
        &self,
        external_key: ExternalKey,
        game_key: &str,
        text: &str,
    ) -> Result<GuessOutcome, AppError> {
        let mut game = self.find(external_key, game_key).await?;

        let guess = game
            .submit_guess(text, self.clock.as_ref())
            .inspect_err(|e| debug!(game_id = %game.id(), error = %e, "guess rejected"))?;

        let game = self.repository.save(game).await?;

        metrics::counter!("codebreaker_guesses_total").increment(1);
        debug!(
            guess_id = %guess.id(),
            exact = guess.exact_matches(),
            near = guess.near_matches(),
            "guess scored"
        );
        if guess.is_solution() {
            metrics::counter!("codebreaker_games_solved_total").increment(1);
            info!(game_key, "game solved");
        }

        Ok(GuessOutcome { game, guess })
    }

    /// Retrieves one guess belonging to the game with `game_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if either key is malformed, the game does
    /// not exist, or the guess belongs to another game.
    pub async fn get_guess(&self, game_key: &str, guess_key: &str) -> Result<Guess, AppError> {
        let game = self.get(game_key).await?;
        let external_key = self.resolve_key(guess_key, "Guess not found")?;

        game.find_guess(external_key).cloned().ok_or_else(|| {
            AppError::not_found(
                "Guess not found",
                json!({ "game": game_key, "id": guess_key }),
            )
        })
    }

    /// Lists the guesses of a game, oldest first.
    pub async fn list_guesses(&self, game_key: &str) -> Result<Vec<Guess>, AppError> {
        Ok(self.get(game_key).await?.guesses().to_vec())
    }

    /// An unparsable key cannot refer to anything, so decode failures are
    /// reported as not found.
    fn resolve_key(&self, key: &str, message: &str) -> Result<ExternalKey, AppError> {
        self.codec
            .decode(key)
            .map(ExternalKey::from_uuid)
            .map_err(|e| {
                debug!(key, error = %e, "undecodable key");
                AppError::not_found(message, json!({ "id": key }))
            })
    }

    async fn find(&self, external_key: ExternalKey, key: &str) -> Result<Game, AppError> {
        self.repository
            .find_by_external_key(external_key)
            .await?
            .ok_or_else(|| AppError::not_found("Game not found", json!({ "id": key })))
    }
}
