//! Symbol pools and secret generation.

use std::collections::HashSet;
use std::fmt;

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::error::AppError;
use crate::utils::random::RandomSource;

pub const POOL_PROPERTY: &str = "pool";
pub const INVALID_CHARACTER_MESSAGE: &str =
    "must not contain whitespace, control, or undefined characters";

/// Largest number of distinct symbols a pool may hold.
pub const MAX_POOL_SIZE: usize = 255;

/// Ordered set of distinct symbols legal in a game's secret and guesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    symbols: Vec<char>,
}

impl Pool {
    /// Validates and normalizes a raw pool.
    ///
    /// Duplicates are removed, keeping the first occurrence of each symbol in
    /// its original position.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on the `pool` property if:
    /// - the pool is empty
    /// - any symbol is a space, line or paragraph separator (non-breaking
    ///   spaces excepted), a control character, or unassigned in Unicode
    /// - more than [`MAX_POOL_SIZE`] distinct symbols remain
    ///
    /// # Examples
    ///
    /// ```
    /// use codebreaker::domain::pool::Pool;
    ///
    /// let pool = Pool::parse("AAABBC").unwrap();
    /// assert_eq!(pool.to_string(), "ABC");
    /// assert!(Pool::parse("AB C").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        let symbols: Vec<char> = raw.chars().filter(|c| seen.insert(*c)).collect();

        if symbols.is_empty() {
            return Err(AppError::invalid_property(POOL_PROPERTY, "must not be empty"));
        }
        if symbols.iter().any(|&c| is_invalid_symbol(c)) {
            return Err(AppError::invalid_property(
                POOL_PROPERTY,
                INVALID_CHARACTER_MESSAGE,
            ));
        }
        if symbols.len() > MAX_POOL_SIZE {
            return Err(AppError::invalid_property(
                POOL_PROPERTY,
                format!("must contain at most {MAX_POOL_SIZE} distinct characters"),
            ));
        }

        Ok(Self { symbols })
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Draws `length` symbols uniformly and independently, with replacement.
    pub fn generate_secret(&self, length: usize, rng: &dyn RandomSource) -> Vec<char> {
        (0..length)
            .map(|_| self.symbols[rng.next_index(self.symbols.len())])
            .collect()
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

fn is_invalid_symbol(c: char) -> bool {
    c.is_control()
        || match get_general_category(c) {
            GeneralCategory::Unassigned => true,
            GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator => !is_non_breaking_space(c),
            _ => false,
        }
}

/// Non-breaking spaces are printable symbols, not separators.
fn is_non_breaking_space(c: char) -> bool {
    matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}')
}
