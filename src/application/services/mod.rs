//! Business logic services for the application layer.

pub mod game_locks;
pub mod game_service;
pub mod maintenance_service;

pub use game_locks::{GameLockGuard, GameLocks};
pub use game_service::{GameService, GuessOutcome};
pub use maintenance_service::{MaintenanceService, run_sweeper};
