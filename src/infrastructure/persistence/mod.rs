//! Repository implementations.
//!
//! # Repositories
//!
//! - [`InMemoryGameRepository`] - process-local game storage

pub mod memory_game_repository;

pub use memory_game_repository::InMemoryGameRepository;
