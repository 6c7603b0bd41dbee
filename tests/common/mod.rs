#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use codebreaker::application::services::{GameService, MaintenanceService};
use codebreaker::domain::clock::Clock;
use codebreaker::domain::entities::NewGame;
use codebreaker::infrastructure::persistence::InMemoryGameRepository;
use codebreaker::utils::key_codec::KeyFormat;
use codebreaker::utils::random::SeededRandom;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub struct TestApp {
    pub repository: Arc<InMemoryGameRepository>,
    pub clock: Arc<ManualClock>,
    pub games: GameService<InMemoryGameRepository>,
    pub maintenance: MaintenanceService<InMemoryGameRepository>,
}

pub fn create_test_app(key_format: KeyFormat) -> TestApp {
    let repository = Arc::new(InMemoryGameRepository::new());
    let clock = Arc::new(ManualClock::new());

    let games = GameService::new(
        repository.clone(),
        key_format.codec(),
        Arc::new(SeededRandom::new(42)),
        clock.clone(),
    );
    let maintenance = MaintenanceService::new(
        repository.clone(),
        games.locks().clone(),
        clock.clone(),
        7,
    );

    TestApp {
        repository,
        clock,
        games,
        maintenance,
    }
}

/// Creates a game with a known secret and returns its encoded key.
pub async fn create_game_with_secret(app: &TestApp, pool: &str, secret: &str) -> String {
    let game = app
        .games
        .create(NewGame::new(pool, secret.chars().count()).with_text(secret))
        .await
        .unwrap();
    app.games.encode_key(game.external_key())
}
