//! Serializable projections of games, guesses and errors.
//!
//! Views are built explicitly from aggregates just before data is handed to a
//! caller. Internal ids never appear; every `id` is the encoded external key.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::{Game, Guess};
use crate::error::AppError;
use crate::utils::key_codec::KeyCodec;

/// Projection of a single guess.
#[derive(Debug, Serialize)]
pub struct GuessView {
    pub id: String,
    pub created: DateTime<Utc>,
    pub text: String,
    pub exact_matches: usize,
    pub near_matches: usize,
    pub solution: bool,
}

impl GuessView {
    pub fn new(guess: &Guess, codec: &dyn KeyCodec) -> Self {
        Self {
            id: codec.encode(guess.external_key().to_uuid()),
            created: guess.created(),
            text: guess.text(),
            exact_matches: guess.exact_matches(),
            near_matches: guess.near_matches(),
            solution: guess.is_solution(),
        }
    }
}

/// Projection of a game.
///
/// The secret `text` is only present once the game is solved; `guesses` only
/// in the detailed projection.
#[derive(Debug, Serialize)]
pub struct GameView {
    pub id: String,
    pub created: DateTime<Utc>,
    pub pool: String,
    pub length: usize,
    pub guess_count: usize,
    pub solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guesses: Option<Vec<GuessView>>,
}

impl GameView {
    /// Summary projection, used in listings.
    pub fn simple(game: &Game, codec: &dyn KeyCodec) -> Self {
        Self {
            id: codec.encode(game.external_key().to_uuid()),
            created: game.created(),
            pool: game.pool().to_string(),
            length: game.length(),
            guess_count: game.guess_count(),
            solved: game.is_solved(),
            text: game.reveal_secret(),
            guesses: None,
        }
    }

    /// Summary projection plus the full guess history.
    pub fn detailed(game: &Game, codec: &dyn KeyCodec) -> Self {
        Self {
            guesses: Some(
                game.guesses()
                    .iter()
                    .map(|guess| GuessView::new(guess, codec))
                    .collect(),
            ),
            ..Self::simple(game, codec)
        }
    }
}

/// Projection of an [`AppError`].
#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<&'static str>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

impl From<&AppError> for ErrorView {
    fn from(error: &AppError) -> Self {
        let details = match error {
            AppError::NotFound { details, .. } | AppError::Internal { details, .. } => {
                details.clone()
            }
            _ => Value::Null,
        };
        Self {
            code: error.code(),
            message: error.to_string(),
            property: error.property(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::SystemClock;
    use crate::domain::entities::NewGame;
    use crate::utils::key_codec::Base36KeyCodec;
    use crate::utils::random::SeededRandom;
    use serde_json::json;

    fn game() -> Game {
        Game::create(
            NewGame::new("ABCD", 4).with_text("ABCD"),
            &SeededRandom::new(0),
            &SystemClock,
        )
        .unwrap()
    }

    #[test]
    fn test_unsolved_game_hides_secret() {
        let mut game = game();
        game.submit_guess("DCBA", &SystemClock).unwrap();

        let value = serde_json::to_value(GameView::simple(&game, &Base36KeyCodec)).unwrap();
        assert_eq!(value["pool"], "ABCD");
        assert_eq!(value["guess_count"], 1);
        assert_eq!(value["solved"], false);
        assert!(value.get("text").is_none());
        assert!(value.get("guesses").is_none());
        assert_eq!(value["id"].as_str().unwrap().len(), 26);
    }

    #[test]
    fn test_solved_game_reveals_secret_and_history() {
        let mut game = game();
        game.submit_guess("DCBA", &SystemClock).unwrap();
        game.submit_guess("ABCD", &SystemClock).unwrap();

        let value = serde_json::to_value(GameView::detailed(&game, &Base36KeyCodec)).unwrap();
        assert_eq!(value["solved"], true);
        assert_eq!(value["text"], "ABCD");

        let guesses = value["guesses"].as_array().unwrap();
        assert_eq!(guesses.len(), 2);
        assert_eq!(guesses[0]["text"], "DCBA");
        assert_eq!(guesses[0]["near_matches"], 4);
        assert_eq!(guesses[1]["solution"], true);
    }

    #[test]
    fn test_error_view() {
        let view = ErrorView::from(&AppError::invalid_property("text", "is wrong"));
        assert_eq!(view.code, "validation_error");
        assert_eq!(view.property, Some("text"));

        let value = serde_json::to_value(ErrorView::from(&AppError::not_found(
            "Game not found",
            json!({ "id": "abc" }),
        )))
        .unwrap();
        assert_eq!(value["details"]["id"], "abc");
        assert!(value.get("property").is_none());
    }
}
