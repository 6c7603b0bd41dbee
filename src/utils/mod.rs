//! Utility building blocks shared across layers.
//!
//! - [`key_codec`] - External key encodings
//! - [`random`] - Random sources for secret generation

pub mod key_codec;
pub mod random;
