//! Common query patterns for the database.
//!
//! These scan secondary keys, so unlike the registry's reverse indexes they
//! are not capped.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;
use interplay_core::{Collection, CollectionId, Game, GameId, Principal, RuleId, TransformationRule};

impl Store {
    /// Get all games owned by a principal.
    pub fn games_by_owner(&self, owner: &Principal) -> Result<Vec<(GameId, Game)>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredGame>(StoredGameKey::owner)?;
        let iter = scan.start_with(owner.as_str())?;
        let games: std::result::Result<Vec<StoredGame>, _> = iter.collect();
        let mut games = games.map_err(|e| Error::Database(e.to_string()))?;
        // start_with is a prefix match; keep exact owners only
        games.retain(|g| g.owner == owner.as_str());
        games.sort_by_key(|g| g.id);
        games.into_iter().map(|g| g.to_game()).collect()
    }

    /// Get every collection registered under a game.
    pub fn collections_by_game(&self, game_id: GameId) -> Result<Vec<(CollectionId, Collection)>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredCollection>(StoredCollectionKey::game_id)?;
        let iter = scan.start_with(game_id.raw())?;
        let collections: std::result::Result<Vec<StoredCollection>, _> = iter.collect();
        let mut collections = collections.map_err(|e| Error::Database(e.to_string()))?;
        collections.sort_by_key(|c| c.id);
        collections.into_iter().map(|c| c.to_collection()).collect()
    }

    /// Get every rule that targets a game, across all source collections.
    pub fn rules_by_target_game(
        &self,
        game_id: GameId,
    ) -> Result<Vec<(RuleId, TransformationRule)>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredRule>(StoredRuleKey::target_game_id)?;
        let iter = scan.start_with(game_id.raw())?;
        let rules: std::result::Result<Vec<StoredRule>, _> = iter.collect();
        let mut rules = rules.map_err(|e| Error::Database(e.to_string()))?;
        rules.sort_by_key(|r| r.id);
        rules.into_iter().map(|r| r.to_rule()).collect()
    }

    /// Count games owned by a principal.
    pub fn count_games_by_owner(&self, owner: &Principal) -> Result<usize> {
        Ok(self.games_by_owner(owner)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interplay_core::{Description, Name, Registry, RegistryConfig, RuleData, RuleType};

    fn populated() -> Registry<Store> {
        let alice = Principal::new("alice");
        let alicia = Principal::new("alice2");
        let bob = Principal::new("bob");
        let mut registry =
            Registry::with_store(Store::in_memory().unwrap(), RegistryConfig::default()).unwrap();

        let name = |s: &str| Name::new(s).unwrap();
        let desc = || Description::new("").unwrap();

        let alpha = registry.register_game(&alice, name("Alpha"), desc(), None).unwrap();
        registry.register_game(&alicia, name("Alpha Prime"), desc(), None).unwrap();
        let beta = registry.register_game(&bob, name("Beta"), desc(), None).unwrap();
        let gamma = registry.register_game(&alice, name("Gamma"), desc(), None).unwrap();

        let swords = registry
            .register_collection(&alice, alpha, Principal::new("SP000.s"), name("Swords"), desc(), None)
            .unwrap();
        let shields = registry
            .register_collection(&alice, alpha, Principal::new("SP000.h"), name("Shields"), desc(), None)
            .unwrap();
        registry
            .register_collection(&alice, gamma, Principal::new("SP000.g"), name("Gems"), desc(), None)
            .unwrap();

        for source in [swords, shields] {
            registry
                .create_transformation_rule(
                    &bob,
                    source,
                    beta,
                    RuleType::new("swap").unwrap(),
                    RuleData::new("{}").unwrap(),
                    None,
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_games_by_owner_is_exact() {
        let registry = populated();
        let store = registry.store();

        let games = store.games_by_owner(&Principal::new("alice")).unwrap();
        let ids: Vec<_> = games.iter().map(|(id, _)| id.raw()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(store.count_games_by_owner(&Principal::new("alice2")).unwrap(), 1);
        assert_eq!(store.count_games_by_owner(&Principal::new("carol")).unwrap(), 0);
    }

    #[test]
    fn test_collections_by_game() {
        let registry = populated();
        let collections = registry.store().collections_by_game(GameId::new(1)).unwrap();
        let names: Vec<_> = collections.iter().map(|(_, c)| c.name.as_str()).collect();
        assert_eq!(names, vec!["Swords", "Shields"]);
        assert!(registry
            .store()
            .collections_by_game(GameId::new(3))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rules_by_target_game() {
        let registry = populated();
        let rules = registry.store().rules_by_target_game(GameId::new(3)).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(|(_, r)| r.target_game_id == GameId::new(3)));
        assert!(registry
            .store()
            .rules_by_target_game(GameId::new(1))
            .unwrap()
            .is_empty());
    }
}
