//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use interplay_core::{
    Collection, CollectionId, Counters, Game, GameId, MemoryStore, PendingWrite, RegistryStore,
    RuleId, TransformationRule, WriteSet,
};
use native_db::*;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

// Read every row of a model in primary key order
macro_rules! scan_all {
    ($r:expr, $model:ty) => {{
        let scan = $r.scan().primary::<$model>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<$model>, _> = iter.collect();
        rows.map_err(|e| Error::Database(e.to_string()))?
    }};
}

// Remove every row of a model inside a read-write transaction
macro_rules! remove_all {
    ($rw:expr, $model:ty) => {
        for row in scan_all!($rw, $model) {
            $rw.remove(row)?;
        }
    };
}

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredGame>().unwrap();
    models.define::<StoredCollection>().unwrap();
    models.define::<StoredRule>().unwrap();
    models.define::<StoredGameCollections>().unwrap();
    models.define::<StoredCollectionGameRules>().unwrap();
    models.define::<StoredCounters>().unwrap();
    models
});

/// Persistent registry store.
///
/// Every [`WriteSet`] is applied inside a single read-write transaction, so
/// a registry operation either lands completely or not at all.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Builder::new()
            .create(&MODELS, path)
            .map_err(|e| Error::Database(e.to_string()))?;
        info!(path = %path.display(), "registry database opened");
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Load a game by ID.
    pub fn load_game(&self, id: GameId) -> Result<Option<Game>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredGame> = r.get().primary(id.raw())?;
        stored.map(|s| s.to_game().map(|(_, game)| game)).transpose()
    }

    /// Load a collection by ID.
    pub fn load_collection(&self, id: CollectionId) -> Result<Option<Collection>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredCollection> = r.get().primary(id.raw())?;
        stored
            .map(|s| s.to_collection().map(|(_, collection)| collection))
            .transpose()
    }

    /// Load a transformation rule by ID.
    pub fn load_rule(&self, id: RuleId) -> Result<Option<TransformationRule>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredRule> = r.get().primary(id.raw())?;
        stored.map(|s| s.to_rule().map(|(_, rule)| rule)).transpose()
    }

    /// Load the collection list of a game.
    pub fn load_game_collections(&self, game_id: GameId) -> Result<Option<Vec<CollectionId>>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredGameCollections> = r.get().primary(game_id.raw())?;
        Ok(stored.map(|s| s.to_ids()))
    }

    /// Load the rule list of a (collection, game) pair.
    pub fn load_collection_game_rules(
        &self,
        collection_id: CollectionId,
        game_id: GameId,
    ) -> Result<Option<Vec<RuleId>>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredCollectionGameRules> = r
            .get()
            .primary(StoredCollectionGameRules::key_for(collection_id, game_id))?;
        Ok(stored.map(|s| s.to_ids()))
    }

    /// Load the ID counters; all zero in a fresh database.
    pub fn load_counters(&self) -> Result<Counters> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredCounters> = r.get().primary(COUNTERS_KEY.to_string())?;
        Ok(stored.map(|s| s.to_counters()).unwrap_or_default())
    }

    /// Apply a write set in one transaction.
    pub fn commit(&self, writes: WriteSet) -> Result<()> {
        let count = writes.len();
        let rw = self.db.rw_transaction()?;
        put_all(&rw, writes)?;
        rw.commit()?;
        debug!(writes = count, "write set committed");
        Ok(())
    }

    /// Replace every table with the contents of an in-memory registry.
    ///
    /// Existing rows are removed in the same transaction that writes the
    /// snapshot, so the database ends up holding exactly the snapshot or,
    /// on error, exactly what it held before.
    pub fn save_snapshot(&self, snapshot: &MemoryStore) -> Result<()> {
        snapshot.check_consistency()?;
        let mut writes = WriteSet::new();
        writes.push(PendingWrite::SetCounters(snapshot.counters()?));
        for (id, game) in snapshot.games() {
            writes.push(PendingWrite::PutGame {
                id,
                game: game.clone(),
            });
        }
        for (id, collection) in snapshot.collections() {
            writes.push(PendingWrite::PutCollection {
                id,
                collection: collection.clone(),
            });
        }
        for (id, rule) in snapshot.rules() {
            writes.push(PendingWrite::PutRule {
                id,
                rule: rule.clone(),
            });
        }
        for (game_id, ids) in snapshot.game_collection_entries() {
            writes.push(PendingWrite::PutGameCollections {
                game_id,
                collection_ids: ids.to_vec(),
            });
        }
        for (collection_id, game_id, ids) in snapshot.collection_game_rule_entries() {
            writes.push(PendingWrite::PutCollectionGameRules {
                collection_id,
                game_id,
                rule_ids: ids.to_vec(),
            });
        }

        let count = writes.len();
        let rw = self.db.rw_transaction()?;
        remove_all!(rw, StoredGame);
        remove_all!(rw, StoredCollection);
        remove_all!(rw, StoredRule);
        remove_all!(rw, StoredGameCollections);
        remove_all!(rw, StoredCollectionGameRules);
        remove_all!(rw, StoredCounters);
        put_all(&rw, writes)?;
        rw.commit()?;
        info!(writes = count, "snapshot imported");
        Ok(())
    }

    /// Export every table into an in-memory registry.
    pub fn load_snapshot(&self) -> Result<MemoryStore> {
        let r = self.db.r_transaction()?;
        let mut writes = WriteSet::new();

        let counters: Option<StoredCounters> = r.get().primary(COUNTERS_KEY.to_string())?;
        writes.push(PendingWrite::SetCounters(
            counters.map(|c| c.to_counters()).unwrap_or_default(),
        ));

        for stored in scan_all!(r, StoredGame) {
            let (id, game) = stored.to_game()?;
            writes.push(PendingWrite::PutGame { id, game });
        }
        for stored in scan_all!(r, StoredCollection) {
            let (id, collection) = stored.to_collection()?;
            writes.push(PendingWrite::PutCollection { id, collection });
        }
        for stored in scan_all!(r, StoredRule) {
            let (id, rule) = stored.to_rule()?;
            writes.push(PendingWrite::PutRule { id, rule });
        }
        for stored in scan_all!(r, StoredGameCollections) {
            writes.push(PendingWrite::PutGameCollections {
                game_id: GameId::new(stored.game_id),
                collection_ids: stored.to_ids(),
            });
        }
        for stored in scan_all!(r, StoredCollectionGameRules) {
            writes.push(PendingWrite::PutCollectionGameRules {
                collection_id: CollectionId::new(stored.collection_id),
                game_id: GameId::new(stored.game_id),
                rule_ids: stored.to_ids(),
            });
        }

        let mut memory = MemoryStore::new();
        memory.apply(writes)?;
        memory.check_consistency()?;
        Ok(memory)
    }
}

// Upsert each pending write into an open transaction
fn put_all(rw: &native_db::transaction::RwTransaction<'_>, writes: WriteSet) -> Result<()> {
    for write in writes {
        match write {
            PendingWrite::SetCounters(counters) => {
                rw.upsert(StoredCounters::from_counters(&counters))?;
            }
            PendingWrite::PutGame { id, game } => {
                rw.upsert(StoredGame::from_game(id, &game))?;
            }
            PendingWrite::PutCollection { id, collection } => {
                rw.upsert(StoredCollection::from_collection(id, &collection))?;
            }
            PendingWrite::PutRule { id, rule } => {
                rw.upsert(StoredRule::from_rule(id, &rule))?;
            }
            PendingWrite::PutGameCollections {
                game_id,
                collection_ids,
            } => {
                rw.upsert(StoredGameCollections::new(game_id, &collection_ids))?;
            }
            PendingWrite::PutCollectionGameRules {
                collection_id,
                game_id,
                rule_ids,
            } => {
                rw.upsert(StoredCollectionGameRules::new(
                    collection_id,
                    game_id,
                    &rule_ids,
                ))?;
            }
        }
    }
    Ok(())
}

impl RegistryStore for Store {
    fn game(&self, id: GameId) -> interplay_core::Result<Option<Game>> {
        Ok(self.load_game(id)?)
    }

    fn collection(&self, id: CollectionId) -> interplay_core::Result<Option<Collection>> {
        Ok(self.load_collection(id)?)
    }

    fn rule(&self, id: RuleId) -> interplay_core::Result<Option<TransformationRule>> {
        Ok(self.load_rule(id)?)
    }

    fn game_collections(
        &self,
        game_id: GameId,
    ) -> interplay_core::Result<Option<Vec<CollectionId>>> {
        Ok(self.load_game_collections(game_id)?)
    }

    fn collection_game_rules(
        &self,
        collection_id: CollectionId,
        game_id: GameId,
    ) -> interplay_core::Result<Option<Vec<RuleId>>> {
        Ok(self.load_collection_game_rules(collection_id, game_id)?)
    }

    fn counters(&self) -> interplay_core::Result<Counters> {
        Ok(self.load_counters()?)
    }

    fn apply(&mut self, writes: WriteSet) -> interplay_core::Result<()> {
        Ok(self.commit(writes)?)
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interplay_core::{
        Description, Error as CoreError, IndexKind, Name, Principal, Registry, RegistryConfig,
        RuleData, RuleType,
    };

    fn registry() -> Registry<Store> {
        Registry::with_store(Store::in_memory().unwrap(), RegistryConfig::default()).unwrap()
    }

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn desc() -> Description {
        Description::new("").unwrap()
    }

    #[test]
    fn test_fresh_database() {
        let store = Store::in_memory().unwrap();
        assert_eq!(store.load_counters().unwrap(), Counters::default());
        assert!(store.load_game(GameId::new(1)).unwrap().is_none());
        assert!(store
            .load_collection_game_rules(CollectionId::new(1), GameId::new(1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_registry_scenario_on_database() {
        let alice = Principal::new("alice");
        let bob = Principal::new("bob");
        let mut registry = registry();

        let alpha = registry.register_game(&alice, name("Alpha"), desc(), None).unwrap();
        let beta = registry.register_game(&bob, name("Beta"), desc(), None).unwrap();
        let swords = registry
            .register_collection(
                &alice,
                alpha,
                Principal::new("SP000.swords"),
                name("Swords"),
                desc(),
                None,
            )
            .unwrap();
        let rule = registry
            .create_transformation_rule(
                &bob,
                swords,
                beta,
                RuleType::new("weapon-swap").unwrap(),
                RuleData::new("{...}").unwrap(),
                None,
            )
            .unwrap();

        assert_eq!((alpha.raw(), beta.raw(), swords.raw(), rule.raw()), (1, 2, 1, 1));
        assert!(registry.is_nft_usable(swords, 42, beta).unwrap());
        assert!(!registry.is_nft_usable(swords, 42, alpha).unwrap());
        assert_eq!(registry.get_game_collections(alpha).unwrap(), Some(vec![swords]));
        assert_eq!(registry.get_game(beta).unwrap().unwrap().owner, bob);
    }

    #[test]
    fn test_capacity_on_database() {
        let alice = Principal::new("alice");
        let config = RegistryConfig::default().with_game_collection_capacity(2);
        let mut registry = Registry::with_store(Store::in_memory().unwrap(), config).unwrap();
        let alpha = registry.register_game(&alice, name("Alpha"), desc(), None).unwrap();

        for _ in 0..2 {
            registry
                .register_collection(&alice, alpha, Principal::new("SP000.c"), name("c"), desc(), None)
                .unwrap();
        }
        let err = registry
            .register_collection(&alice, alpha, Principal::new("SP000.c"), name("c"), desc(), None)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::IndexCapacityExceeded {
                index: IndexKind::GameCollections,
                ..
            }
        ));
        assert_eq!(registry.get_collection_count().unwrap(), 2);
        assert!(registry.get_collection(CollectionId::new(3)).unwrap().is_none());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let alice = Principal::new("alice");
        let mut memory = Registry::new();
        let alpha = memory.register_game(&alice, name("Alpha"), desc(), None).unwrap();
        let swords = memory
            .register_collection(&alice, alpha, Principal::new("SP000.s"), name("Swords"), desc(), None)
            .unwrap();
        memory
            .create_transformation_rule(
                &alice,
                swords,
                alpha,
                RuleType::new("identity").unwrap(),
                RuleData::new("").unwrap(),
                None,
            )
            .unwrap();
        let snapshot = memory.into_store();

        let store = Store::in_memory().unwrap();
        store.save_snapshot(&snapshot).unwrap();
        assert_eq!(store.load_snapshot().unwrap(), snapshot);

        // Allocation resumes from the imported counters
        let mut registry = Registry::with_store(store, RegistryConfig::default()).unwrap();
        let beta = registry
            .register_game(&Principal::new("bob"), name("Beta"), desc(), None)
            .unwrap();
        assert_eq!(beta, GameId::new(2));
    }

    #[test]
    fn test_snapshot_replaces_populated_database() {
        let alice = Principal::new("alice");
        let bob = Principal::new("bob");

        // Bob owns games 1 to 3, with a collection and rule under game 2
        let mut existing = registry();
        for title in ["One", "Two", "Three"] {
            existing.register_game(&bob, name(title), desc(), None).unwrap();
        }
        let swords = existing
            .register_collection(&bob, GameId::new(2), Principal::new("SP000.s"), name("Swords"), desc(), None)
            .unwrap();
        existing
            .create_transformation_rule(
                &bob,
                swords,
                GameId::new(3),
                RuleType::new("swap").unwrap(),
                RuleData::new("{}").unwrap(),
                None,
            )
            .unwrap();
        let store = existing.into_store();

        let mut memory = Registry::new();
        memory.register_game(&alice, name("Alpha"), desc(), None).unwrap();
        let snapshot = memory.into_store();

        store.save_snapshot(&snapshot).unwrap();
        assert_eq!(store.load_snapshot().unwrap(), snapshot);
        assert!(store.load_game(GameId::new(2)).unwrap().is_none());
        assert!(store.load_collection(swords).unwrap().is_none());
        assert!(store
            .load_collection_game_rules(swords, GameId::new(3))
            .unwrap()
            .is_none());
        assert!(store.games_by_owner(&bob).unwrap().is_empty());

        // The next game gets a fresh ID and nothing else changes hands
        let mut registry = Registry::with_store(store, RegistryConfig::default()).unwrap();
        let next = registry.register_game(&alice, name("Beta"), desc(), None).unwrap();
        assert_eq!(next, GameId::new(2));
        assert_eq!(registry.get_game_count().unwrap(), 2);
        assert_eq!(registry.store().games_by_owner(&alice).unwrap().len(), 2);
    }

    #[test]
    fn test_inconsistent_snapshot_leaves_database_untouched() {
        let bob = Principal::new("bob");
        let mut existing = registry();
        existing.register_game(&bob, name("One"), desc(), None).unwrap();
        let store = existing.into_store();

        // Counters say nothing was allocated, yet a game is present
        let text = "(counters: (games: 0, collections: 0, rules: 0), \
                    games: {1: (owner: (\"alice\"), name: \"A\", description: \"\", metadata_uri: None)}, \
                    collections: {}, rules: {}, game_collections: {}, collection_game_rules: {})";
        let decoded: MemoryStore = ron::from_str(text).unwrap();

        let err = store.save_snapshot(&decoded).unwrap_err();
        assert!(matches!(err, Error::Registry(CoreError::Corrupt(_))));
        assert_eq!(store.load_counters().unwrap().games, 1);
        assert_eq!(store.load_game(GameId::new(1)).unwrap().unwrap().owner, bob);
    }
}
