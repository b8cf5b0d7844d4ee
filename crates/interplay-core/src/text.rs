//! Length-bounded text fields
//!
//! Registry operations only accept [`BoundedText`] values, so length limits
//! are checked once at the boundary where raw strings enter the system and
//! never again inside the registry.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// A string of at most `N` bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoundedText<const N: usize>(String);

/// Display name of a game or collection
pub type Name = BoundedText<64>;
/// Free-form description of a game or collection
pub type Description = BoundedText<256>;
/// Off-registry metadata location
pub type MetadataUri = BoundedText<256>;
/// Rule discriminator interpreted by game logic
pub type RuleType = BoundedText<32>;
/// Opaque rule payload interpreted by game logic
pub type RuleData = BoundedText<1024>;

impl<const N: usize> BoundedText<N> {
    /// Maximum length in bytes
    pub const MAX_LEN: usize = N;

    /// Validate `value` against the bound
    pub fn new(value: impl Into<String>) -> Result<Self> {
        Self::named("text", value)
    }

    /// Validate `value`, naming `field` in the error if it is too long
    pub fn named(field: &'static str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > N {
            return Err(Error::TextTooLong {
                field,
                max: N,
                len: value.len(),
            });
        }
        Ok(Self(value))
    }

    /// Get the text as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<const N: usize> Deref for BoundedText<N> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> fmt::Display for BoundedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const N: usize> TryFrom<String> for BoundedText<N> {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl<const N: usize> TryFrom<&str> for BoundedText<N> {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl<const N: usize> From<BoundedText<N>> for String {
    fn from(text: BoundedText<N>) -> Self {
        text.0
    }
}
