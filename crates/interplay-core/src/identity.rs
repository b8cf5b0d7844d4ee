//! Identity types for registry records and callers

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! registry_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create an ID from its raw value
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw ID value
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

registry_id!(
    /// Identifier of a registered game, allocated from `game-count`
    GameId,
    "game"
);

registry_id!(
    /// Identifier of a registered NFT collection, allocated from `collection-count`
    CollectionId,
    "collection"
);

registry_id!(
    /// Identifier of a transformation rule, allocated from `rule-count`
    RuleId,
    "rule"
);

/// An identity that can own games or back a collection contract
///
/// The registry treats principals as opaque: equality is the only
/// operation authorization needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    /// Create a new principal
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the principal as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self(s)
    }
}
