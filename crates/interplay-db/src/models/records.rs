//! Entity record models for database storage.

use crate::error::{Error, Result};
use interplay_core::{
    BoundedText, Collection, CollectionId, Game, GameId, Principal, RuleId, TransformationRule,
};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Re-validate a stored string against its bound.
fn bounded<const N: usize>(field: &'static str, value: &str) -> Result<BoundedText<N>> {
    BoundedText::named(field, value).map_err(|e| Error::Corrupt(e.to_string()))
}

fn bounded_opt<const N: usize>(
    field: &'static str,
    value: &Option<String>,
) -> Result<Option<BoundedText<N>>> {
    value.as_deref().map(|v| bounded(field, v)).transpose()
}

/// Stored game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredGame {
    /// Primary key - game ID.
    #[primary_key]
    pub id: u64,
    /// Owning principal.
    #[secondary_key]
    pub owner: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Metadata URI.
    pub metadata_uri: Option<String>,
}

impl StoredGame {
    /// Create from a registry game.
    pub fn from_game(id: GameId, game: &Game) -> Self {
        Self {
            id: id.raw(),
            owner: game.owner.as_str().to_string(),
            name: game.name.as_str().to_string(),
            description: game.description.as_str().to_string(),
            metadata_uri: game.metadata_uri.as_ref().map(|u| u.as_str().to_string()),
        }
    }

    /// Convert to a registry game.
    pub fn to_game(&self) -> Result<(GameId, Game)> {
        Ok((
            GameId::new(self.id),
            Game {
                owner: Principal::new(self.owner.clone()),
                name: bounded("name", &self.name)?,
                description: bounded("description", &self.description)?,
                metadata_uri: bounded_opt("metadata_uri", &self.metadata_uri)?,
            },
        ))
    }
}

/// Stored NFT collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredCollection {
    /// Primary key - collection ID.
    #[primary_key]
    pub id: u64,
    /// Parent game ID.
    #[secondary_key]
    pub game_id: u64,
    /// Contract principal.
    pub contract_address: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Metadata URI.
    pub metadata_uri: Option<String>,
}

impl StoredCollection {
    /// Create from a registry collection.
    pub fn from_collection(id: CollectionId, collection: &Collection) -> Self {
        Self {
            id: id.raw(),
            game_id: collection.game_id.raw(),
            contract_address: collection.contract_address.as_str().to_string(),
            name: collection.name.as_str().to_string(),
            description: collection.description.as_str().to_string(),
            metadata_uri: collection
                .metadata_uri
                .as_ref()
                .map(|u| u.as_str().to_string()),
        }
    }

    /// Convert to a registry collection.
    pub fn to_collection(&self) -> Result<(CollectionId, Collection)> {
        Ok((
            CollectionId::new(self.id),
            Collection {
                game_id: GameId::new(self.game_id),
                contract_address: Principal::new(self.contract_address.clone()),
                name: bounded("name", &self.name)?,
                description: bounded("description", &self.description)?,
                metadata_uri: bounded_opt("metadata_uri", &self.metadata_uri)?,
            },
        ))
    }
}

/// Stored transformation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredRule {
    /// Primary key - rule ID.
    #[primary_key]
    pub id: u64,
    /// Source collection ID.
    pub source_collection_id: u64,
    /// Target game ID.
    #[secondary_key]
    pub target_game_id: u64,
    /// Rule discriminator.
    pub rule_type: String,
    /// Opaque payload.
    pub rule_data: String,
    /// Metadata URI.
    pub metadata_uri: Option<String>,
}

impl StoredRule {
    /// Create from a registry rule.
    pub fn from_rule(id: RuleId, rule: &TransformationRule) -> Self {
        Self {
            id: id.raw(),
            source_collection_id: rule.source_collection_id.raw(),
            target_game_id: rule.target_game_id.raw(),
            rule_type: rule.rule_type.as_str().to_string(),
            rule_data: rule.rule_data.as_str().to_string(),
            metadata_uri: rule.metadata_uri.as_ref().map(|u| u.as_str().to_string()),
        }
    }

    /// Convert to a registry rule.
    pub fn to_rule(&self) -> Result<(RuleId, TransformationRule)> {
        Ok((
            RuleId::new(self.id),
            TransformationRule {
                source_collection_id: CollectionId::new(self.source_collection_id),
                target_game_id: GameId::new(self.target_game_id),
                rule_type: bounded("rule_type", &self.rule_type)?,
                rule_data: bounded("rule_data", &self.rule_data)?,
                metadata_uri: bounded_opt("metadata_uri", &self.metadata_uri)?,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interplay_core::{Description, MetadataUri, Name, RuleData, RuleType};

    #[test]
    fn test_game_conversion() {
        let game = Game {
            owner: Principal::new("alice"),
            name: Name::new("Alpha").unwrap(),
            description: Description::new("first").unwrap(),
            metadata_uri: Some(MetadataUri::new("ipfs://alpha").unwrap()),
        };
        let stored = StoredGame::from_game(GameId::new(4), &game);
        assert_eq!(stored.owner, "alice");
        assert_eq!(stored.to_game().unwrap(), (GameId::new(4), game));
    }

    #[test]
    fn test_rule_conversion() {
        let rule = TransformationRule {
            source_collection_id: CollectionId::new(1),
            target_game_id: GameId::new(2),
            rule_type: RuleType::new("weapon-swap").unwrap(),
            rule_data: RuleData::new("{}").unwrap(),
            metadata_uri: None,
        };
        let stored = StoredRule::from_rule(RuleId::new(1), &rule);
        assert_eq!(stored.target_game_id, 2);
        assert_eq!(stored.to_rule().unwrap().1, rule);
    }

    #[test]
    fn test_oversized_row_is_corrupt() {
        let stored = StoredCollection {
            id: 1,
            game_id: 1,
            contract_address: "SP000.c".to_string(),
            name: "n".repeat(65),
            description: String::new(),
            metadata_uri: None,
        };
        assert!(matches!(stored.to_collection(), Err(Error::Corrupt(_))));
    }
}
