//! The registry operation surface
//!
//! Every mutating operation follows the same three phases:
//!
//! 1. Read the prerequisite records from the store
//! 2. Check existence, ownership, and reverse index capacity
//! 3. Describe the effects as a [`WriteSet`] and hand it to the store
//!
//! Nothing is written before phase 3, and the store applies the write set
//! as a unit, so a failed operation leaves every table and counter exactly
//! as it found them.
//!
//! Operations take `&mut self` and never block. Ordering between callers is
//! whatever order the host serializes calls in.

use crate::config::RegistryConfig;
use crate::error::{Error, IndexKind, Result};
use crate::index::BoundedList;
use crate::store::{MemoryStore, RegistryStore};
use crate::write_set::{PendingWrite, WriteSet};
use crate::{
    Collection, CollectionId, Description, Game, GameId, MetadataUri, Name, Principal, RuleData,
    RuleId, RuleType, TransformationRule,
};
use tracing::{debug, info};

#[cfg(feature = "journal")]
use crate::journal::{Journal, RegistryEvent};

/// Registry of games, their NFT collections, and transformation rules
///
/// A game's owner is the only caller allowed to change the game, register
/// or update its collections, and create or update rules that target it.
/// Ownership is looked up at the time of each call, so transferring a game
/// moves control of everything scoped beneath it.
pub struct Registry<S = MemoryStore> {
    store: S,
    config: RegistryConfig,
    #[cfg(feature = "journal")]
    journal: Journal,
}

impl Registry<MemoryStore> {
    /// Create a registry over a fresh in-memory store with default settings
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            config: RegistryConfig::default(),
            #[cfg(feature = "journal")]
            journal: Journal::default(),
        }
    }

    /// Create a registry over a fresh in-memory store
    pub fn in_memory(config: RegistryConfig) -> Result<Self> {
        Self::with_store(MemoryStore::new(), config)
    }
}

impl Default for Registry<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RegistryStore> Registry<S> {
    /// Create a registry over an existing store
    pub fn with_store(store: S, config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            #[cfg(feature = "journal")]
            journal: Journal::with_config(config.journal().clone()),
            store,
            config,
        })
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the registry and return its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Get the configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the journal of committed mutations
    #[cfg(feature = "journal")]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Get the journal mutably, e.g. to toggle recording
    #[cfg(feature = "journal")]
    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    // ---------------------------------------------------------------------
    // Games
    // ---------------------------------------------------------------------

    /// Register a new game owned by `caller`
    ///
    /// Always succeeds against a healthy store. The returned ID equals the
    /// new game count.
    pub fn register_game(
        &mut self,
        caller: &Principal,
        name: Name,
        description: Description,
        metadata_uri: Option<MetadataUri>,
    ) -> Result<GameId> {
        let mut counters = self.store.counters()?;
        let game_id = counters.next_game();

        let mut writes = WriteSet::new();
        writes.push(PendingWrite::SetCounters(counters));
        writes.push(PendingWrite::PutGame {
            id: game_id,
            game: Game {
                owner: caller.clone(),
                name,
                description,
                metadata_uri,
            },
        });
        self.store.apply(writes)?;

        info!(%game_id, %caller, "game registered");
        #[cfg(feature = "journal")]
        self.journal
            .record(caller, RegistryEvent::GameRegistered { game_id });
        Ok(game_id)
    }

    /// Replace a game's display fields
    ///
    /// The owner is left as it is; use
    /// [`transfer_game_ownership`](Self::transfer_game_ownership) to change it.
    pub fn update_game(
        &mut self,
        caller: &Principal,
        game_id: GameId,
        name: Name,
        description: Description,
        metadata_uri: Option<MetadataUri>,
    ) -> Result<()> {
        let game = self.owned_game(caller, game_id, Error::GameNotFound)?;

        let mut writes = WriteSet::new();
        writes.push(PendingWrite::PutGame {
            id: game_id,
            game: Game {
                owner: game.owner,
                name,
                description,
                metadata_uri,
            },
        });
        self.store.apply(writes)?;

        debug!(%game_id, %caller, "game updated");
        #[cfg(feature = "journal")]
        self.journal
            .record(caller, RegistryEvent::GameUpdated { game_id });
        Ok(())
    }

    /// Hand a game, and control of its collections and rules, to `new_owner`
    pub fn transfer_game_ownership(
        &mut self,
        caller: &Principal,
        game_id: GameId,
        new_owner: Principal,
    ) -> Result<()> {
        let mut game = self.owned_game(caller, game_id, Error::GameNotFound)?;
        let previous = std::mem::replace(&mut game.owner, new_owner.clone());

        let mut writes = WriteSet::new();
        writes.push(PendingWrite::PutGame { id: game_id, game });
        self.store.apply(writes)?;

        info!(%game_id, from = %previous, to = %new_owner, "game ownership transferred");
        #[cfg(feature = "journal")]
        self.journal.record(
            caller,
            RegistryEvent::GameOwnershipTransferred {
                game_id,
                from: previous,
                to: new_owner,
            },
        );
        Ok(())
    }

    /// Look up a game
    pub fn get_game(&self, game_id: GameId) -> Result<Option<Game>> {
        self.store.game(game_id)
    }

    /// Number of games registered so far
    pub fn get_game_count(&self) -> Result<u64> {
        Ok(self.store.counters()?.games)
    }

    // ---------------------------------------------------------------------
    // Collections
    // ---------------------------------------------------------------------

    /// Register an NFT collection under a game owned by `caller`
    ///
    /// Fails with [`Error::IndexCapacityExceeded`] once the game already
    /// lists as many collections as the configured capacity; in that case
    /// no ID is allocated.
    pub fn register_collection(
        &mut self,
        caller: &Principal,
        game_id: GameId,
        contract_address: Principal,
        name: Name,
        description: Description,
        metadata_uri: Option<MetadataUri>,
    ) -> Result<CollectionId> {
        self.owned_game(caller, game_id, Error::GameNotFound)?;

        let mut index = BoundedList::get_or_default(
            IndexKind::GameCollections,
            self.config.game_collection_capacity(),
            self.store.game_collections(game_id)?,
        );
        index.ensure_room()?;

        let mut counters = self.store.counters()?;
        let collection_id = counters.next_collection();
        index.push(collection_id)?;

        let mut writes = WriteSet::new();
        writes.push(PendingWrite::SetCounters(counters));
        writes.push(PendingWrite::PutCollection {
            id: collection_id,
            collection: Collection {
                game_id,
                contract_address,
                name,
                description,
                metadata_uri,
            },
        });
        writes.push(PendingWrite::PutGameCollections {
            game_id,
            collection_ids: index.into_vec(),
        });
        self.store.apply(writes)?;

        info!(%collection_id, %game_id, %caller, "collection registered");
        #[cfg(feature = "journal")]
        self.journal.record(
            caller,
            RegistryEvent::CollectionRegistered {
                collection_id,
                game_id,
            },
        );
        Ok(collection_id)
    }

    /// Replace a collection's display fields
    ///
    /// The parent game and contract address never change.
    pub fn update_collection(
        &mut self,
        caller: &Principal,
        collection_id: CollectionId,
        name: Name,
        description: Description,
        metadata_uri: Option<MetadataUri>,
    ) -> Result<()> {
        let collection = self
            .store
            .collection(collection_id)?
            .ok_or(Error::CollectionNotFound(collection_id))?;
        let game_id = collection.game_id;
        self.owned_game(caller, game_id, Error::GameNotFound)?;

        let mut writes = WriteSet::new();
        writes.push(PendingWrite::PutCollection {
            id: collection_id,
            collection: Collection {
                name,
                description,
                metadata_uri,
                ..collection
            },
        });
        self.store.apply(writes)?;

        debug!(%collection_id, %game_id, %caller, "collection updated");
        #[cfg(feature = "journal")]
        self.journal.record(
            caller,
            RegistryEvent::CollectionUpdated {
                collection_id,
                game_id,
            },
        );
        Ok(())
    }

    /// Look up a collection
    pub fn get_collection(&self, collection_id: CollectionId) -> Result<Option<Collection>> {
        self.store.collection(collection_id)
    }

    /// Collections registered under a game, oldest first
    ///
    /// `None` until the game's first collection is registered.
    pub fn get_game_collections(&self, game_id: GameId) -> Result<Option<Vec<CollectionId>>> {
        self.store.game_collections(game_id)
    }

    /// Number of collections registered so far
    pub fn get_collection_count(&self) -> Result<u64> {
        Ok(self.store.counters()?.collections)
    }

    // ---------------------------------------------------------------------
    // Transformation rules
    // ---------------------------------------------------------------------

    /// Declare how assets of `source_collection_id` are read by `target_game_id`
    ///
    /// Only the target game's owner is consulted; the source collection's
    /// game has no say.
    pub fn create_transformation_rule(
        &mut self,
        caller: &Principal,
        source_collection_id: CollectionId,
        target_game_id: GameId,
        rule_type: RuleType,
        rule_data: RuleData,
        metadata_uri: Option<MetadataUri>,
    ) -> Result<RuleId> {
        if self.store.collection(source_collection_id)?.is_none() {
            return Err(Error::SourceCollectionNotFound(source_collection_id));
        }
        self.owned_game(caller, target_game_id, Error::TargetGameNotFound)?;

        let mut index = BoundedList::get_or_default(
            IndexKind::CollectionGameRules,
            self.config.collection_rule_capacity(),
            self.store
                .collection_game_rules(source_collection_id, target_game_id)?,
        );
        index.ensure_room()?;

        let mut counters = self.store.counters()?;
        let rule_id = counters.next_rule();
        index.push(rule_id)?;

        let mut writes = WriteSet::new();
        writes.push(PendingWrite::SetCounters(counters));
        writes.push(PendingWrite::PutRule {
            id: rule_id,
            rule: TransformationRule {
                source_collection_id,
                target_game_id,
                rule_type,
                rule_data,
                metadata_uri,
            },
        });
        writes.push(PendingWrite::PutCollectionGameRules {
            collection_id: source_collection_id,
            game_id: target_game_id,
            rule_ids: index.into_vec(),
        });
        self.store.apply(writes)?;

        info!(
            %rule_id,
            source = %source_collection_id,
            target = %target_game_id,
            %caller,
            "transformation rule created"
        );
        #[cfg(feature = "journal")]
        self.journal.record(
            caller,
            RegistryEvent::RuleCreated {
                rule_id,
                source_collection_id,
                target_game_id,
            },
        );
        Ok(rule_id)
    }

    /// Replace a rule's type, payload, and metadata
    ///
    /// Source collection and target game never change.
    pub fn update_transformation_rule(
        &mut self,
        caller: &Principal,
        rule_id: RuleId,
        rule_type: RuleType,
        rule_data: RuleData,
        metadata_uri: Option<MetadataUri>,
    ) -> Result<()> {
        let rule = self
            .store
            .rule(rule_id)?
            .ok_or(Error::RuleNotFound(rule_id))?;
        let target_game_id = rule.target_game_id;
        self.owned_game(caller, target_game_id, Error::TargetGameNotFound)?;

        let mut writes = WriteSet::new();
        writes.push(PendingWrite::PutRule {
            id: rule_id,
            rule: TransformationRule {
                rule_type,
                rule_data,
                metadata_uri,
                ..rule
            },
        });
        self.store.apply(writes)?;

        debug!(%rule_id, target = %target_game_id, %caller, "transformation rule updated");
        #[cfg(feature = "journal")]
        self.journal.record(
            caller,
            RegistryEvent::RuleUpdated {
                rule_id,
                target_game_id,
            },
        );
        Ok(())
    }

    /// Look up a transformation rule
    pub fn get_transformation_rule(&self, rule_id: RuleId) -> Result<Option<TransformationRule>> {
        self.store.rule(rule_id)
    }

    /// Rules declared for a (source collection, target game) pair, oldest first
    pub fn get_collection_game_rules(
        &self,
        source_collection_id: CollectionId,
        target_game_id: GameId,
    ) -> Result<Option<Vec<RuleId>>> {
        self.store
            .collection_game_rules(source_collection_id, target_game_id)
    }

    /// Number of transformation rules created so far
    pub fn get_rule_count(&self) -> Result<u64> {
        Ok(self.store.counters()?.rules)
    }

    /// Whether assets of a collection can be presented to a game
    ///
    /// True iff at least one rule maps the collection into the game. Usability
    /// is decided per collection; `_token_id` is accepted so callers can pass
    /// the asset they hold, and per-token policy belongs to whatever
    /// interprets the rule data.
    pub fn is_nft_usable(
        &self,
        collection_id: CollectionId,
        _token_id: u64,
        game_id: GameId,
    ) -> Result<bool> {
        Ok(self
            .store
            .collection_game_rules(collection_id, game_id)?
            .is_some_and(|rules| !rules.is_empty()))
    }

    /// Load a game and check that `caller` owns it
    fn owned_game(
        &self,
        caller: &Principal,
        game_id: GameId,
        not_found: fn(GameId) -> Error,
    ) -> Result<Game> {
        let game = self.store.game(game_id)?.ok_or(not_found(game_id))?;
        if !game.is_owned_by(caller) {
            debug!(%game_id, %caller, owner = %game.owner, "mutation denied");
            return Err(Error::NotAuthorized {
                caller: caller.clone(),
                game_id,
            });
        }
        Ok(game)
    }
}
