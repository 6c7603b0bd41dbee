//! Repository trait definitions for the domain layer.
//!
//! The domain treats storage as a collection of game aggregates
//! keyed by identifier. Implementations live in
//! `crate::infrastructure::persistence`; mock implementations are generated
//! with `mockall` for service tests.

pub mod game_repository;

pub use game_repository::{GameRepository, StatusFilter};

#[cfg(test)]
pub use game_repository::MockGameRepository;
