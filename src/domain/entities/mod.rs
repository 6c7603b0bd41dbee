//! Core domain entities.
//!
//! - [`Game`] - aggregate root owning a secret, its pool and its guess history
//! - [`Guess`] - immutable scored attempt, owned exclusively by one game
//! - [`NewGame`] - input for creating a game

pub mod game;
pub mod guess;

pub use game::{Game, GameState, MAX_CODE_LENGTH, MIN_CODE_LENGTH, NewGame};
pub use guess::Guess;
