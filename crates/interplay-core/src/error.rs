//! Error types for interplay-core

use crate::{CollectionId, GameId, Principal, RuleId};
use std::fmt;
use thiserror::Error;

/// Which reverse index rejected an append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// game -> collections
    GameCollections,
    /// (collection, game) -> rules
    CollectionGameRules,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::GameCollections => write!(f, "game collections"),
            IndexKind::CollectionGameRules => write!(f, "collection game rules"),
        }
    }
}

/// Core error type
///
/// Every variant is terminal for the operation that produced it: the
/// registry has made no writes when one of these is returned.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Collection not found: {0}")]
    CollectionNotFound(CollectionId),

    #[error("Rule not found: {0}")]
    RuleNotFound(RuleId),

    #[error("Source collection not found: {0}")]
    SourceCollectionNotFound(CollectionId),

    #[error("Target game not found: {0}")]
    TargetGameNotFound(GameId),

    #[error("Not authorized: {caller} does not own {game_id}")]
    NotAuthorized { caller: Principal, game_id: GameId },

    #[error("Index capacity exceeded: {index} index is full ({capacity} entries)")]
    IndexCapacityExceeded { index: IndexKind, capacity: usize },

    #[error("Text too long: {field} allows {max} bytes, got {len}")]
    TextTooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Decoded tables contradict each other
    #[error("Corrupt registry data: {0}")]
    Corrupt(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is one of the not-found family
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::GameNotFound(_)
                | Error::CollectionNotFound(_)
                | Error::RuleNotFound(_)
                | Error::SourceCollectionNotFound(_)
                | Error::TargetGameNotFound(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
