//! Infrastructure layer for external integrations.
//!
//! Implements the storage contracts declared by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - repository implementations

pub mod persistence;
