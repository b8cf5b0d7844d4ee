//! Deferred writes for single-operation atomicity
//!
//! Registry operations never touch the store while they validate. They read
//! what they need, check existence, authorization and index capacity, and
//! only then describe their effects as a [`WriteSet`]. The store applies the
//! whole set in one step, so an operation either commits every write
//! (counter, primary record, reverse index) or none of them.

use crate::{Collection, CollectionId, Counters, Game, GameId, RuleId, TransformationRule};
use serde::{Deserialize, Serialize};

/// A pending write to one registry table
///
/// Every variant is a last-writer-wins overwrite keyed by its ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingWrite {
    /// Replace the ID counters
    SetCounters(Counters),

    /// Insert or overwrite a game record
    PutGame {
        /// The game's ID
        id: GameId,
        /// The full record
        game: Game,
    },

    /// Insert or overwrite a collection record
    PutCollection {
        /// The collection's ID
        id: CollectionId,
        /// The full record
        collection: Collection,
    },

    /// Insert or overwrite a transformation rule record
    PutRule {
        /// The rule's ID
        id: RuleId,
        /// The full record
        rule: TransformationRule,
    },

    /// Replace the collection list of a game
    PutGameCollections {
        /// The parent game
        game_id: GameId,
        /// Collections in registration order
        collection_ids: Vec<CollectionId>,
    },

    /// Replace the rule list of a (source collection, target game) pair
    PutCollectionGameRules {
        /// The source collection
        collection_id: CollectionId,
        /// The target game
        game_id: GameId,
        /// Rules in creation order
        rule_ids: Vec<RuleId>,
    },
}

/// An ordered batch of pending writes applied atomically by a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSet {
    /// The pending writes in order
    writes: Vec<PendingWrite>,
}

impl WriteSet {
    /// Create a new empty WriteSet
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pending write to the set
    pub fn push(&mut self, write: PendingWrite) {
        self.writes.push(write);
    }

    /// Get the number of pending writes
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Check if the WriteSet is empty
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Get an iterator over the pending writes
    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.writes.iter()
    }

    /// Consume the WriteSet and return the underlying writes
    pub fn into_writes(self) -> Vec<PendingWrite> {
        self.writes
    }
}

impl IntoIterator for WriteSet {
    type Item = PendingWrite;
    type IntoIter = std::vec::IntoIter<PendingWrite>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}
