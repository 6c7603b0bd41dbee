//! # Codebreaker
//!
//! A Mastermind-style code-breaking game engine. A secret sequence of symbols
//! is drawn from a caller-supplied pool, and guesses are scored against it
//! (exact and near matches) until it is solved.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Game aggregate, scoring, pools and repository traits
//! - **Application Layer** ([`application`]) - Services orchestrating repositories and rules
//! - **Infrastructure Layer** ([`infrastructure`]) - Repository implementations
//! - **Presentation** ([`view`], [`cli`]) - Serializable projections and the session command language
//!
//! ## Features
//!
//! - Pool validation with Unicode-aware symbol checks
//! - Secrets drawn from the operating system CSPRNG
//! - Duplicate-safe exact/near scoring
//! - Opaque fixed-width external keys (base36 or base64url)
//! - Scheduled removal of stale games
//!
//! ## Quick Start
//!
//! ```bash
//! # Play in the terminal
//! cargo run -- play --pool ABCDEF --length 4
//!
//! # Score a single guess
//! cargo run -- score ABACAB AABBCC
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;
pub mod view;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{GameService, MaintenanceService};
    pub use crate::domain::clock::{Clock, SystemClock};
    pub use crate::domain::entities::{Game, GameState, Guess, NewGame};
    pub use crate::domain::repositories::{GameRepository, StatusFilter};
    pub use crate::domain::scoring::Score;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::InMemoryGameRepository;
    pub use crate::utils::key_codec::{KeyCodec, KeyFormat};
    pub use crate::utils::random::{OsRandom, RandomSource};
}
