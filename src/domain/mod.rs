//! Domain layer: game rules independent of storage and presentation.
//!
//! # Architecture
//!
//! - [`entities`] - the game aggregate and its guesses
//! - [`pool`] - pool validation and secret generation
//! - [`scoring`] - exact and near match computation
//! - [`ids`] - internal ids and external keys
//! - [`clock`] - timestamp source
//! - [`repositories`] - storage contracts implemented by the infrastructure layer
//!
//! # Guess Flow
//!
//! 1. [`crate::application::services::GameService`] loads the game by external key
//! 2. [`entities::Game::submit_guess`] validates the text and scores it with [`scoring::score`]
//! 3. The updated aggregate is saved through [`repositories::GameRepository`]

pub mod clock;
pub mod entities;
pub mod ids;
pub mod pool;
pub mod repositories;
pub mod scoring;
