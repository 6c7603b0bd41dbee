//! Scheduled removal of stale games.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info};

use super::game_locks::GameLocks;
use crate::domain::clock::Clock;
use crate::domain::repositories::GameRepository;
use crate::error::AppError;

/// Deletes games that have seen no activity for a configured period.
///
/// A game is stale when it was created before the cutoff and no guess was
/// recorded against it after the cutoff.
pub struct MaintenanceService<R: GameRepository> {
    repository: Arc<R>,
    locks: GameLocks,
    clock: Arc<dyn Clock>,
    stale_after: TimeDelta,
}

impl<R: GameRepository> MaintenanceService<R> {
    /// Creates a maintenance service removing games idle for `stale_days`.
    ///
    /// `locks` must be the same registry the [`super::GameService`] over this
    /// repository uses.
    pub fn new(
        repository: Arc<R>,
        locks: GameLocks,
        clock: Arc<dyn Clock>,
        stale_days: u32,
    ) -> Self {
        Self {
            repository,
            locks,
            clock,
            stale_after: TimeDelta::days(i64::from(stale_days)),
        }
    }

    /// Current staleness cutoff.
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.clock.now() - self.stale_after
    }

    /// Deletes every game that is stale relative to `cutoff`.
    ///
    /// Returns the number of games deleted.
    ///
    /// # Errors
    ///
    /// Returns the first repository error; games deleted before it stay deleted.
    pub async fn sweep_before(&self, cutoff: DateTime<Utc>) -> Result<usize, AppError> {
        let candidates = self.repository.find_stale(cutoff).await?;

        let mut removed = 0;
        for candidate in &candidates {
            let key = candidate.external_key();
            let _lock = self.locks.lock(key).await;

            // The candidate list may predate a guess or a removal.
            let Some(game) = self.repository.find_by_external_key(key).await? else {
                continue;
            };
            if game.is_stale(cutoff) && self.repository.delete(&game).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            metrics::counter!("codebreaker_games_swept_total").increment(removed as u64);
            info!(removed, %cutoff, "stale games removed");
        }

        Ok(removed)
    }

    /// Deletes games stale relative to [`Self::cutoff`].
    pub async fn sweep(&self) -> Result<usize, AppError> {
        self.sweep_before(self.cutoff()).await
    }
}

/// Runs [`MaintenanceService::sweep`] every `interval` until the task is aborted.
///
/// Sweep failures are logged and retried on the next tick.
pub async fn run_sweeper<R: GameRepository + 'static>(
    service: Arc<MaintenanceService<R>>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = service.sweep().await {
            error!(error = %e, "stale game sweep failed");
        }
    }
}
