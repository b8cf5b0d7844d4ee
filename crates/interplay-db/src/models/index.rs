//! Reverse index and counter models for database storage.

use interplay_core::{CollectionId, Counters, GameId, RuleId};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Primary key of the single counters row.
pub const COUNTERS_KEY: &str = "counters";

/// Stored game -> collections index entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredGameCollections {
    /// Primary key - parent game ID.
    #[primary_key]
    pub game_id: u64,
    /// Collection IDs in registration order.
    pub collection_ids: Vec<u64>,
}

impl StoredGameCollections {
    /// Create from an index entry.
    pub fn new(game_id: GameId, collection_ids: &[CollectionId]) -> Self {
        Self {
            game_id: game_id.raw(),
            collection_ids: collection_ids.iter().map(|id| id.raw()).collect(),
        }
    }

    /// Convert to registry IDs.
    pub fn to_ids(&self) -> Vec<CollectionId> {
        self.collection_ids
            .iter()
            .copied()
            .map(CollectionId::new)
            .collect()
    }
}

/// Stored (collection, game) -> rules index entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredCollectionGameRules {
    /// Primary key - "collection:game".
    #[primary_key]
    pub key: String,
    /// Source collection ID.
    pub collection_id: u64,
    /// Target game ID.
    pub game_id: u64,
    /// Rule IDs in creation order.
    pub rule_ids: Vec<u64>,
}

impl StoredCollectionGameRules {
    /// Primary key for a (collection, game) pair.
    pub fn key_for(collection_id: CollectionId, game_id: GameId) -> String {
        format!("{}:{}", collection_id.raw(), game_id.raw())
    }

    /// Create from an index entry.
    pub fn new(collection_id: CollectionId, game_id: GameId, rule_ids: &[RuleId]) -> Self {
        Self {
            key: Self::key_for(collection_id, game_id),
            collection_id: collection_id.raw(),
            game_id: game_id.raw(),
            rule_ids: rule_ids.iter().map(|id| id.raw()).collect(),
        }
    }

    /// Convert to registry IDs.
    pub fn to_ids(&self) -> Vec<RuleId> {
        self.rule_ids.iter().copied().map(RuleId::new).collect()
    }
}

/// Stored ID counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredCounters {
    /// Always "counters" - single row.
    #[primary_key]
    pub id: String,
    /// Last game ID allocated.
    pub games: u64,
    /// Last collection ID allocated.
    pub collections: u64,
    /// Last rule ID allocated.
    pub rules: u64,
}

impl StoredCounters {
    /// Create from registry counters.
    pub fn from_counters(counters: &Counters) -> Self {
        Self {
            id: COUNTERS_KEY.to_string(),
            games: counters.games,
            collections: counters.collections,
            rules: counters.rules,
        }
    }

    /// Convert to registry counters.
    pub fn to_counters(&self) -> Counters {
        Counters {
            games: self.games,
            collections: self.collections,
            rules: self.rules,
        }
    }
}
