//! Registry configuration
//!
//! Reverse index capacities and, with the `journal` feature, journal
//! settings. Configurations are plain serde structs, so hosts can embed them
//! in their own settings or load them from a RON file.

use crate::error::{Error, Result};
use crate::index::DEFAULT_INDEX_CAPACITY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[cfg(feature = "journal")]
use crate::journal::JournalConfig;

/// Configuration for a [`crate::Registry`]
///
/// # Example
///
/// ```
/// use interplay_core::RegistryConfig;
///
/// let config = RegistryConfig::default();
/// assert_eq!(config.game_collection_capacity(), 20);
/// assert_eq!(config.collection_rule_capacity(), 20);
///
/// let config = RegistryConfig::from_ron_str("(game_collection_capacity: 5)").unwrap();
/// assert_eq!(config.game_collection_capacity(), 5);
/// assert_eq!(config.collection_rule_capacity(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum collections listed under one game
    game_collection_capacity: usize,
    /// Maximum rules listed under one (collection, game) pair
    collection_rule_capacity: usize,
    /// Journal settings
    #[cfg(feature = "journal")]
    journal: JournalConfig,
}

impl RegistryConfig {
    /// Parse a configuration from RON text
    ///
    /// Missing fields take their default values. Zero capacities are
    /// rejected.
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: RegistryConfig =
            ron::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&content)
    }

    /// Serialize this configuration as pretty RON
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Check that every capacity admits at least one entry
    pub fn validate(&self) -> Result<()> {
        if self.game_collection_capacity == 0 {
            return Err(Error::InvalidConfig(
                "game_collection_capacity must be at least 1".to_string(),
            ));
        }
        if self.collection_rule_capacity == 0 {
            return Err(Error::InvalidConfig(
                "collection_rule_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the game -> collections capacity
    pub fn with_game_collection_capacity(mut self, capacity: usize) -> Self {
        self.game_collection_capacity = capacity;
        self
    }

    /// Set the (collection, game) -> rules capacity
    pub fn with_collection_rule_capacity(mut self, capacity: usize) -> Self {
        self.collection_rule_capacity = capacity;
        self
    }

    /// Get the game -> collections capacity
    pub fn game_collection_capacity(&self) -> usize {
        self.game_collection_capacity
    }

    /// Get the (collection, game) -> rules capacity
    pub fn collection_rule_capacity(&self) -> usize {
        self.collection_rule_capacity
    }

    /// Set the journal configuration
    #[cfg(feature = "journal")]
    pub fn with_journal(mut self, journal: JournalConfig) -> Self {
        self.journal = journal;
        self
    }

    /// Get the journal configuration
    #[cfg(feature = "journal")]
    pub fn journal(&self) -> &JournalConfig {
        &self.journal
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            game_collection_capacity: DEFAULT_INDEX_CAPACITY,
            collection_rule_capacity: DEFAULT_INDEX_CAPACITY,
            #[cfg(feature = "journal")]
            journal: JournalConfig::default(),
        }
    }
}
