//! Storage seam for the registry tables
//!
//! [`RegistryStore`] is the only way the registry reaches its tables: one
//! getter per table plus [`RegistryStore::apply`], which commits a
//! [`WriteSet`] as a unit. [`MemoryStore`] is the in-process implementation;
//! persistent backends live in other crates.

use crate::error::{Error, Result};
use crate::write_set::{PendingWrite, WriteSet};
use crate::{Collection, CollectionId, Counters, Game, GameId, RuleId, TransformationRule};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Table access used by [`crate::Registry`]
///
/// Getters return owned records. `apply` must be all-or-nothing: if it
/// returns an error, none of the writes in the set may be visible.
pub trait RegistryStore {
    /// Look up a game record
    fn game(&self, id: GameId) -> Result<Option<Game>>;

    /// Look up a collection record
    fn collection(&self, id: CollectionId) -> Result<Option<Collection>>;

    /// Look up a transformation rule record
    fn rule(&self, id: RuleId) -> Result<Option<TransformationRule>>;

    /// Collections registered under a game, in registration order
    fn game_collections(&self, game_id: GameId) -> Result<Option<Vec<CollectionId>>>;

    /// Rules for a (source collection, target game) pair, in creation order
    fn collection_game_rules(
        &self,
        collection_id: CollectionId,
        game_id: GameId,
    ) -> Result<Option<Vec<RuleId>>>;

    /// Current ID counters
    fn counters(&self) -> Result<Counters>;

    /// Commit a batch of writes atomically
    fn apply(&mut self, writes: WriteSet) -> Result<()>;
}

/// In-memory registry tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    counters: Counters,
    games: IndexMap<GameId, Game>,
    collections: IndexMap<CollectionId, Collection>,
    rules: IndexMap<RuleId, TransformationRule>,
    /// Index: game -> collections
    game_collections: IndexMap<GameId, Vec<CollectionId>>,
    /// Index: (source collection, target game) -> rules
    collection_game_rules: IndexMap<(CollectionId, GameId), Vec<RuleId>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// All games in allocation order
    pub fn games(&self) -> impl Iterator<Item = (GameId, &Game)> {
        self.games.iter().map(|(id, game)| (*id, game))
    }

    /// All collections in allocation order
    pub fn collections(&self) -> impl Iterator<Item = (CollectionId, &Collection)> {
        self.collections.iter().map(|(id, c)| (*id, c))
    }

    /// All transformation rules in allocation order
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &TransformationRule)> {
        self.rules.iter().map(|(id, r)| (*id, r))
    }

    /// Every game -> collections index entry
    pub fn game_collection_entries(&self) -> impl Iterator<Item = (GameId, &[CollectionId])> {
        self.game_collections
            .iter()
            .map(|(id, ids)| (*id, ids.as_slice()))
    }

    /// Every (collection, game) -> rules index entry
    pub fn collection_game_rule_entries(
        &self,
    ) -> impl Iterator<Item = (CollectionId, GameId, &[RuleId])> {
        self.collection_game_rules
            .iter()
            .map(|((c, g), ids)| (*c, *g, ids.as_slice()))
    }

    /// Total number of records across the three entity tables
    pub fn len(&self) -> usize {
        self.games.len() + self.collections.len() + self.rules.len()
    }

    /// Check if no entity has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the tables agree with each other and with the counters
    ///
    /// Every stored ID must lie in `1..=counter` for its table, every
    /// reference must name an existing record, and every index entry must
    /// list only children of its key. Stores built by [`crate::Registry`]
    /// always pass; decoded snapshots are checked before use.
    pub fn check_consistency(&self) -> Result<()> {
        fn allocated(id: u64, counter: u64, what: &dyn std::fmt::Display) -> Result<()> {
            if id == 0 || id > counter {
                return Err(Error::Corrupt(format!(
                    "{} lies outside the allocated range 1..={}",
                    what, counter
                )));
            }
            Ok(())
        }

        for id in self.games.keys() {
            allocated(id.raw(), self.counters.games, id)?;
        }
        for (id, collection) in &self.collections {
            allocated(id.raw(), self.counters.collections, id)?;
            if !self.games.contains_key(&collection.game_id) {
                return Err(Error::Corrupt(format!(
                    "{} belongs to missing {}",
                    id, collection.game_id
                )));
            }
        }
        for (id, rule) in &self.rules {
            allocated(id.raw(), self.counters.rules, id)?;
            if !self.collections.contains_key(&rule.source_collection_id) {
                return Err(Error::Corrupt(format!(
                    "{} reads missing {}",
                    id, rule.source_collection_id
                )));
            }
            if !self.games.contains_key(&rule.target_game_id) {
                return Err(Error::Corrupt(format!(
                    "{} targets missing {}",
                    id, rule.target_game_id
                )));
            }
        }

        for (game_id, ids) in &self.game_collections {
            for id in ids {
                match self.collections.get(id) {
                    Some(c) if c.game_id == *game_id => {}
                    _ => {
                        return Err(Error::Corrupt(format!(
                            "collection index of {} lists foreign or missing {}",
                            game_id, id
                        )))
                    }
                }
            }
        }
        for ((collection_id, game_id), ids) in &self.collection_game_rules {
            for id in ids {
                match self.rules.get(id) {
                    Some(r)
                        if r.source_collection_id == *collection_id
                            && r.target_game_id == *game_id => {}
                    _ => {
                        return Err(Error::Corrupt(format!(
                            "rule index of ({}, {}) lists foreign or missing {}",
                            collection_id, game_id, id
                        )))
                    }
                }
            }
        }
        Ok(())
    }

    fn put(&mut self, write: PendingWrite) {
        match write {
            PendingWrite::SetCounters(counters) => self.counters = counters,
            PendingWrite::PutGame { id, game } => {
                self.games.insert(id, game);
            }
            PendingWrite::PutCollection { id, collection } => {
                self.collections.insert(id, collection);
            }
            PendingWrite::PutRule { id, rule } => {
                self.rules.insert(id, rule);
            }
            PendingWrite::PutGameCollections {
                game_id,
                collection_ids,
            } => {
                self.game_collections.insert(game_id, collection_ids);
            }
            PendingWrite::PutCollectionGameRules {
                collection_id,
                game_id,
                rule_ids,
            } => {
                self.collection_game_rules
                    .insert((collection_id, game_id), rule_ids);
            }
        }
    }
}

impl RegistryStore for MemoryStore {
    fn game(&self, id: GameId) -> Result<Option<Game>> {
        Ok(self.games.get(&id).cloned())
    }

    fn collection(&self, id: CollectionId) -> Result<Option<Collection>> {
        Ok(self.collections.get(&id).cloned())
    }

    fn rule(&self, id: RuleId) -> Result<Option<TransformationRule>> {
        Ok(self.rules.get(&id).cloned())
    }

    fn game_collections(&self, game_id: GameId) -> Result<Option<Vec<CollectionId>>> {
        Ok(self.game_collections.get(&game_id).cloned())
    }

    fn collection_game_rules(
        &self,
        collection_id: CollectionId,
        game_id: GameId,
    ) -> Result<Option<Vec<RuleId>>> {
        Ok(self
            .collection_game_rules
            .get(&(collection_id, game_id))
            .cloned())
    }

    fn counters(&self) -> Result<Counters> {
        Ok(self.counters)
    }

    // In-memory puts cannot fail, so applying in order is all-or-nothing.
    fn apply(&mut self, writes: WriteSet) -> Result<()> {
        for write in writes {
            self.put(write);
        }
        Ok(())
    }
}
