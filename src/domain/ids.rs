//! Strongly typed identifiers.
//!
//! Internal ids are primary keys that never leave the process. Each entity
//! also carries an [`ExternalKey`], which is the only identity handed to
//! callers (after passing through a [`crate::utils::key_codec::KeyCodec`]).

use std::fmt;

use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id!(
    /// Primary key of a [`crate::domain::entities::Game`].
    GameId
);
define_id!(
    /// Primary key of a [`crate::domain::entities::Guess`].
    GuessId
);
define_id!(
    /// Externally visible identity of a game or guess.
    ExternalKey
);
