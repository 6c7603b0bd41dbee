//! Repository trait for game aggregates.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::Game;
use crate::domain::ids::ExternalKey;
use crate::error::AppError;

const STATUS_PROPERTY: &str = "status";

/// Read-side filter over the solved predicate of [`Game::is_solved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Unsolved,
    Solved,
}

impl StatusFilter {
    pub const VALUES: [StatusFilter; 3] =
        [StatusFilter::All, StatusFilter::Unsolved, StatusFilter::Solved];

    pub fn matches(self, game: &Game) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Unsolved => !game.is_solved(),
            StatusFilter::Solved => game.is_solved(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("ALL"),
            StatusFilter::Unsolved => f.write_str("UNSOLVED"),
            StatusFilter::Solved => f.write_str("SOLVED"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    /// Parses a filter keyword, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::VALUES
            .into_iter()
            .find(|status| status.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AppError::invalid_property(
                    STATUS_PROPERTY,
                    "must be one of [ALL, UNSOLVED, SOLVED] (case-insensitive).",
                )
            })
    }
}

/// Repository interface for game aggregates.
///
/// A saved game is stored together with its whole guess history; saving an
/// aggregate that already exists replaces the stored copy.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryGameRepository`] - process-local storage
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Inserts or replaces a game and returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failure.
    async fn save(&self, game: Game) -> Result<Game, AppError>;

    /// Finds a game by its external key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Game))` if found
    /// - `Ok(None)` if not found
    async fn find_by_external_key(&self, key: ExternalKey) -> Result<Option<Game>, AppError>;

    /// Removes a game and all of its guesses.
    ///
    /// Returns `Ok(true)` if the game existed.
    async fn delete(&self, game: &Game) -> Result<bool, AppError>;

    /// Lists games matching `filter`, most recently created first.
    async fn list_by_created_desc(&self, filter: StatusFilter) -> Result<Vec<Game>, AppError>;

    /// Finds games created before `cutoff` with no guess recorded after it.
    async fn find_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<Game>, AppError>;
}
