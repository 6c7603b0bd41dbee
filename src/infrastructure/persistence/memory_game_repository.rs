//! In-memory implementation of the game repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::Game;
use crate::domain::ids::{ExternalKey, GameId};
use crate::domain::repositories::{GameRepository, StatusFilter};
use crate::error::AppError;

/// Game storage held in process memory.
///
/// Aggregates are keyed by internal id with a secondary index on external
/// key. Suitable for tests and single-process sessions; contents are lost on
/// exit.
#[derive(Default)]
pub struct InMemoryGameRepository {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    games: HashMap<GameId, Game>,
    by_external_key: HashMap<ExternalKey, GameId>,
}

impl InMemoryGameRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    pub async fn len(&self) -> usize {
        self.inner.read().await.games.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn sorted_by_created_desc(mut games: Vec<Game>) -> Vec<Game> {
    games.sort_by(|a, b| b.created().cmp(&a.created()));
    games
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn save(&self, game: Game) -> Result<Game, AppError> {
        let mut tables = self.inner.write().await;
        tables.by_external_key.insert(game.external_key(), game.id());
        tables.games.insert(game.id(), game.clone());
        debug!(game_id = %game.id(), guesses = game.guess_count(), "game saved");
        Ok(game)
    }

    async fn find_by_external_key(&self, key: ExternalKey) -> Result<Option<Game>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .by_external_key
            .get(&key)
            .and_then(|id| tables.games.get(id))
            .cloned())
    }

    async fn delete(&self, game: &Game) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        tables.by_external_key.remove(&game.external_key());
        Ok(tables.games.remove(&game.id()).is_some())
    }

    async fn list_by_created_desc(&self, filter: StatusFilter) -> Result<Vec<Game>, AppError> {
        let tables = self.inner.read().await;
        let games = tables
            .games
            .values()
            .filter(|game| filter.matches(game))
            .cloned()
            .collect();
        Ok(sorted_by_created_desc(games))
    }

    async fn find_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<Game>, AppError> {
        let tables = self.inner.read().await;
        let games = tables
            .games
            .values()
            .filter(|game| game.is_stale(cutoff))
            .cloned()
            .collect();
        Ok(sorted_by_created_desc(games))
    }
}
