//! Application layer services.
//!
//! Services orchestrate domain operations: they resolve external keys,
//! load aggregates through repository traits, apply the game rules and store
//! the result. They are the only place where the external key encoding is
//! applied.
//!
//! # Available Services
//!
//! - [`services::game_service::GameService`] - Game creation, lookup and guess submission
//! - [`services::maintenance_service::MaintenanceService`] - Stale game cleanup

pub mod services;
