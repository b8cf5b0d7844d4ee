//! Registry records
//!
//! Records carry no identifier of their own; they are keyed by the ID they
//! were allocated under in the owning table.

use crate::{
    CollectionId, Description, GameId, MetadataUri, Name, Principal, RuleData, RuleId, RuleType,
};
use serde::{Deserialize, Serialize};

/// A registered game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Sole authorizer for the game and everything scoped beneath it
    pub owner: Principal,
    pub name: Name,
    pub description: Description,
    pub metadata_uri: Option<MetadataUri>,
}

impl Game {
    /// Check whether `caller` owns this game
    pub fn is_owned_by(&self, caller: &Principal) -> bool {
        &self.owner == caller
    }
}

/// An NFT collection registered under exactly one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Parent game; fixed at registration
    pub game_id: GameId,
    /// Contract backing the collection; fixed at registration
    pub contract_address: Principal,
    pub name: Name,
    pub description: Description,
    pub metadata_uri: Option<MetadataUri>,
}

/// Directional mapping of a source collection's assets into a target game
///
/// `rule_data` is opaque here and interpreted by the target game's logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationRule {
    pub source_collection_id: CollectionId,
    /// The game whose owner authored, and may update, this rule
    pub target_game_id: GameId,
    pub rule_type: RuleType,
    pub rule_data: RuleData,
    pub metadata_uri: Option<MetadataUri>,
}

/// The three monotonic ID counters
///
/// Each counter equals the last ID handed out for its table, so the next
/// allocation is always `count + 1` and 0 means "nothing allocated yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub games: u64,
    pub collections: u64,
    pub rules: u64,
}

impl Counters {
    /// Allocate the next game ID
    pub fn next_game(&mut self) -> GameId {
        self.games += 1;
        GameId::new(self.games)
    }

    /// Allocate the next collection ID
    pub fn next_collection(&mut self) -> CollectionId {
        self.collections += 1;
        CollectionId::new(self.collections)
    }

    /// Allocate the next rule ID
    pub fn next_rule(&mut self) -> RuleId {
        self.rules += 1;
        RuleId::new(self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_one() {
        let mut counters = Counters::default();
        assert_eq!(counters.next_game(), GameId::new(1));
        assert_eq!(counters.next_game(), GameId::new(2));
        assert_eq!(counters.next_collection(), CollectionId::new(1));
        assert_eq!(counters.games, 2);
        assert_eq!(counters.collections, 1);
        assert_eq!(counters.rules, 0);
    }

    #[test]
    fn test_game_ownership() {
        let game = Game {
            owner: Principal::new("alice"),
            name: Name::new("Alpha").unwrap(),
            description: Description::new("").unwrap(),
            metadata_uri: None,
        };
        assert!(game.is_owned_by(&Principal::new("alice")));
        assert!(!game.is_owned_by(&Principal::new("bob")));
    }
}
