//! Journal of successful registry mutations
//!
//! The journal provides:
//! - An audit trail of who changed what, in commit order
//! - Per-kind statistics for reporting
//!
//! Failed operations are never recorded, so the journal mirrors exactly the
//! writes that reached the store.
//!
//! # Example
//!
//! ```rust,ignore
//! use interplay_core::{JournalConfig, Registry, RegistryConfig};
//!
//! let config = RegistryConfig::default().with_journal(JournalConfig {
//!     recording_enabled: true,
//!     ..Default::default()
//! });
//! let mut registry = Registry::in_memory(config)?;
//! registry.register_game(&alice, name, description, None)?;
//!
//! assert_eq!(registry.journal().stats().game_registered, 1);
//! ```

use crate::{CollectionId, GameId, Principal, RuleId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A committed registry mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A game was registered
    GameRegistered {
        /// The new game
        game_id: GameId,
    },
    /// A game's display fields were updated
    GameUpdated {
        /// The updated game
        game_id: GameId,
    },
    /// A game changed owner
    GameOwnershipTransferred {
        /// The transferred game
        game_id: GameId,
        /// Previous owner
        from: Principal,
        /// New owner
        to: Principal,
    },
    /// A collection was registered under a game
    CollectionRegistered {
        /// The new collection
        collection_id: CollectionId,
        /// Its parent game
        game_id: GameId,
    },
    /// A collection's display fields were updated
    CollectionUpdated {
        /// The updated collection
        collection_id: CollectionId,
        /// Its parent game
        game_id: GameId,
    },
    /// A transformation rule was created
    RuleCreated {
        /// The new rule
        rule_id: RuleId,
        /// Source collection
        source_collection_id: CollectionId,
        /// Target game
        target_game_id: GameId,
    },
    /// A transformation rule was updated
    RuleUpdated {
        /// The updated rule
        rule_id: RuleId,
        /// Target game
        target_game_id: GameId,
    },
}

impl RegistryEvent {
    /// The kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            RegistryEvent::GameRegistered { .. } => EventKind::GameRegistered,
            RegistryEvent::GameUpdated { .. } => EventKind::GameUpdated,
            RegistryEvent::GameOwnershipTransferred { .. } => EventKind::GameOwnershipTransferred,
            RegistryEvent::CollectionRegistered { .. } => EventKind::CollectionRegistered,
            RegistryEvent::CollectionUpdated { .. } => EventKind::CollectionUpdated,
            RegistryEvent::RuleCreated { .. } => EventKind::RuleCreated,
            RegistryEvent::RuleUpdated { .. } => EventKind::RuleUpdated,
        }
    }

    /// The game whose owner authorized this event
    pub fn game_id(&self) -> GameId {
        match self {
            RegistryEvent::GameRegistered { game_id }
            | RegistryEvent::GameUpdated { game_id }
            | RegistryEvent::GameOwnershipTransferred { game_id, .. }
            | RegistryEvent::CollectionRegistered { game_id, .. }
            | RegistryEvent::CollectionUpdated { game_id, .. } => *game_id,
            RegistryEvent::RuleCreated { target_game_id, .. }
            | RegistryEvent::RuleUpdated { target_game_id, .. } => *target_game_id,
        }
    }
}

/// Discriminant of a [`RegistryEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    GameRegistered,
    GameUpdated,
    GameOwnershipTransferred,
    CollectionRegistered,
    CollectionUpdated,
    RuleCreated,
    RuleUpdated,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::GameRegistered => "register-game",
            EventKind::GameUpdated => "update-game",
            EventKind::GameOwnershipTransferred => "transfer-game-ownership",
            EventKind::CollectionRegistered => "register-collection",
            EventKind::CollectionUpdated => "update-collection",
            EventKind::RuleCreated => "create-transformation-rule",
            EventKind::RuleUpdated => "update-transformation-rule",
        };
        write!(f, "{}", name)
    }
}

/// A journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Commit sequence number, starting at 0
    pub seq: u64,
    /// Who performed the mutation
    pub caller: Principal,
    /// What was committed
    pub event: RegistryEvent,
}

/// Configuration for the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Whether recording is enabled
    pub recording_enabled: bool,
    /// Maximum number of entries to keep (0 = unlimited)
    pub max_entries: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            recording_enabled: false,
            max_entries: 0, // Unlimited
        }
    }
}

/// The journal of committed mutations
#[derive(Debug, Clone, Default)]
pub struct Journal {
    /// Configuration
    config: JournalConfig,
    /// Recorded entries
    entries: Vec<JournalEntry>,
    /// Next sequence number; keeps counting across dropped entries
    next_seq: u64,
}

impl Journal {
    /// Create a new journal with recording disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: JournalConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Start recording
    pub fn start_recording(&mut self) {
        self.config.recording_enabled = true;
    }

    /// Stop recording
    pub fn stop_recording(&mut self) {
        self.config.recording_enabled = false;
    }

    /// Check if recording is enabled
    pub fn is_recording(&self) -> bool {
        self.config.recording_enabled
    }

    /// Record a committed mutation
    pub fn record(&mut self, caller: &Principal, event: RegistryEvent) {
        if !self.config.recording_enabled {
            return;
        }

        self.entries.push(JournalEntry {
            seq: self.next_seq,
            caller: caller.clone(),
            event,
        });
        self.next_seq += 1;

        self.enforce_limits();
    }

    /// Get all entries
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Get entries with a sequence number of at least `seq`
    pub fn entries_since(&self, seq: u64) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(move |e| e.seq >= seq)
    }

    /// Get entries in a sequence range (inclusive)
    pub fn entries_in_range(&self, start: u64, end: u64) -> Vec<&JournalEntry> {
        self.entries
            .iter()
            .filter(|e| e.seq >= start && e.seq <= end)
            .collect()
    }

    /// Get statistics about the journal
    pub fn stats(&self) -> JournalStats {
        let mut stats = JournalStats {
            total_entries: self.entries.len(),
            first_seq: self.entries.first().map(|e| e.seq),
            last_seq: self.entries.last().map(|e| e.seq),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.event.kind() {
                EventKind::GameRegistered => stats.game_registered += 1,
                EventKind::GameUpdated => stats.game_updated += 1,
                EventKind::GameOwnershipTransferred => stats.ownership_transferred += 1,
                EventKind::CollectionRegistered => stats.collection_registered += 1,
                EventKind::CollectionUpdated => stats.collection_updated += 1,
                EventKind::RuleCreated => stats.rule_created += 1,
                EventKind::RuleUpdated => stats.rule_updated += 1,
            }
        }
        stats
    }

    fn enforce_limits(&mut self) {
        if self.config.max_entries > 0 && self.entries.len() > self.config.max_entries {
            let excess = self.entries.len() - self.config.max_entries;
            self.entries.drain(0..excess);
        }
    }
}

/// Statistics about the journal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalStats {
    /// Total number of entries
    pub total_entries: usize,
    pub game_registered: usize,
    pub game_updated: usize,
    pub ownership_transferred: usize,
    pub collection_registered: usize,
    pub collection_updated: usize,
    pub rule_created: usize,
    pub rule_updated: usize,
    /// First sequence number retained
    pub first_seq: Option<u64>,
    /// Last sequence number retained
    pub last_seq: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal::new("alice")
    }

    #[test]
    fn test_journal_recording() {
        let mut journal = Journal::new();
        journal.start_recording();

        journal.record(&alice(), RegistryEvent::GameRegistered { game_id: GameId(1) });
        journal.record(
            &alice(),
            RegistryEvent::CollectionRegistered {
                collection_id: CollectionId(1),
                game_id: GameId(1),
            },
        );

        let stats = journal.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.game_registered, 1);
        assert_eq!(stats.collection_registered, 1);
        assert_eq!(stats.first_seq, Some(0));
        assert_eq!(stats.last_seq, Some(1));
    }

    #[test]
    fn test_journal_disabled() {
        let mut journal = Journal::new();
        // Recording disabled by default
        journal.record(&alice(), RegistryEvent::GameRegistered { game_id: GameId(1) });

        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_max_entries_limit() {
        let mut journal = Journal::with_config(JournalConfig {
            recording_enabled: true,
            max_entries: 3,
        });

        for id in 1..=5 {
            journal.record(&alice(), RegistryEvent::GameUpdated { game_id: GameId(id) });
        }

        assert_eq!(journal.entries().len(), 3);
        // Oldest entries are dropped; sequence numbers keep counting
        assert_eq!(journal.entries()[0].seq, 2);
        assert_eq!(journal.stats().last_seq, Some(4));
    }

    #[test]
    fn test_entries_in_range() {
        let mut journal = Journal::new();
        journal.start_recording();
        for id in 1..=6 {
            journal.record(&alice(), RegistryEvent::GameRegistered { game_id: GameId(id) });
        }

        let range = journal.entries_in_range(2, 4);
        assert_eq!(range.len(), 3);
        assert!(range.iter().all(|e| e.seq >= 2 && e.seq <= 4));
        assert_eq!(journal.entries_since(5).count(), 1);
    }

    #[test]
    fn test_event_game_id() {
        let event = RegistryEvent::RuleCreated {
            rule_id: RuleId(1),
            source_collection_id: CollectionId(1),
            target_game_id: GameId(2),
        };
        assert_eq!(event.game_id(), GameId(2));
        assert_eq!(event.kind(), EventKind::RuleCreated);
        assert_eq!(event.kind().to_string(), "create-transformation-rule");
    }
}
