//! Auditing and analytics for registry journals

use interplay_core::{EventKind, GameId, Journal, JournalEntry, Principal, RegistryEvent};
use std::collections::HashMap;

/// Auditor for querying and analyzing journal data
pub struct Auditor<'a> {
    journal: &'a Journal,
}

impl<'a> Auditor<'a> {
    /// Create a new auditor for a journal
    pub fn new(journal: &'a Journal) -> Self {
        Self { journal }
    }

    /// Generate a comprehensive audit report
    pub fn generate_report(&self) -> AuditReport {
        let stats = self.journal.stats();
        let mut event_counts: HashMap<EventKind, u64> = HashMap::new();
        let mut caller_actions: HashMap<Principal, u64> = HashMap::new();
        let mut game_activity: HashMap<GameId, u64> = HashMap::new();

        for entry in self.journal.entries() {
            *event_counts.entry(entry.event.kind()).or_insert(0) += 1;
            *caller_actions.entry(entry.caller.clone()).or_insert(0) += 1;
            *game_activity.entry(entry.event.game_id()).or_insert(0) += 1;
        }

        AuditReport {
            total_entries: stats.total_entries,
            first_seq: stats.first_seq,
            last_seq: stats.last_seq,
            event_counts,
            caller_actions,
            game_activity,
        }
    }

    /// Query entries matching specific criteria
    pub fn query(&self, query: &AuditQuery) -> Vec<&JournalEntry> {
        self.journal
            .entries()
            .iter()
            .filter(|entry| query.matches(entry))
            .collect()
    }

    /// Get a summary of mutations by a specific caller
    pub fn caller_summary(&self, caller: &Principal) -> EventSummary {
        let mut total = 0;
        let mut by_kind: HashMap<EventKind, u64> = HashMap::new();

        for entry in self.journal.entries() {
            if &entry.caller == caller {
                total += 1;
                *by_kind.entry(entry.event.kind()).or_insert(0) += 1;
            }
        }

        EventSummary { total, by_kind }
    }

    /// Count occurrences of a specific event kind
    pub fn count_kind(&self, kind: EventKind) -> u64 {
        self.journal
            .entries()
            .iter()
            .filter(|entry| entry.event.kind() == kind)
            .count() as u64
    }

    /// Every principal that ever changed ownership of `game_id`, oldest first
    ///
    /// Starts with the owner at the first recorded transfer; empty if the
    /// game was never transferred while recording.
    pub fn ownership_chain(&self, game_id: GameId) -> Vec<&Principal> {
        let mut chain: Vec<&Principal> = Vec::new();
        for entry in self.journal.entries() {
            if let RegistryEvent::GameOwnershipTransferred {
                game_id: id,
                from,
                to,
            } = &entry.event
            {
                if *id != game_id {
                    continue;
                }
                if chain.is_empty() {
                    chain.push(from);
                }
                chain.push(to);
            }
        }
        chain
    }
}

/// A comprehensive audit report
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Total number of journal entries
    pub total_entries: usize,
    /// First sequence number in journal
    pub first_seq: Option<u64>,
    /// Last sequence number in journal
    pub last_seq: Option<u64>,
    /// Count of each event kind
    pub event_counts: HashMap<EventKind, u64>,
    /// Mutations by caller
    pub caller_actions: HashMap<Principal, u64>,
    /// Mutations by authorizing game
    pub game_activity: HashMap<GameId, u64>,
}

impl std::fmt::Display for AuditReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Audit Report ===")?;
        writeln!(f, "Total entries: {}", self.total_entries)?;

        if let (Some(first), Some(last)) = (self.first_seq, self.last_seq) {
            writeln!(f, "Sequence range: {} - {}", first, last)?;
        }

        if !self.event_counts.is_empty() {
            writeln!(f, "\nEvents by kind:")?;
            let mut sorted: Vec<_> = self.event_counts.iter().collect();
            sorted.sort_by(|a, b| {
                b.1.cmp(a.1)
                    .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
            });
            for (kind, count) in sorted {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

        if !self.caller_actions.is_empty() {
            writeln!(f, "\nActions by caller:")?;
            let mut sorted: Vec<_> = self.caller_actions.iter().collect();
            sorted.sort();
            for (caller, count) in sorted {
                writeln!(f, "  {}: {}", caller, count)?;
            }
        }

        if !self.game_activity.is_empty() {
            writeln!(f, "\nActivity by game:")?;
            let mut sorted: Vec<_> = self.game_activity.iter().collect();
            sorted.sort();
            for (game_id, count) in sorted {
                writeln!(f, "  {}: {}", game_id, count)?;
            }
        }

        Ok(())
    }
}

/// Query criteria for filtering journal entries
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Start sequence number (inclusive)
    pub start_seq: Option<u64>,
    /// End sequence number (inclusive)
    pub end_seq: Option<u64>,
    /// Filter by caller
    pub caller: Option<Principal>,
    /// Filter by authorizing game
    pub game_id: Option<GameId>,
    /// Filter by event kind
    pub kind: Option<EventKind>,
}

impl AuditQuery {
    fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(start) = self.start_seq {
            if entry.seq < start {
                return false;
            }
        }
        if let Some(end) = self.end_seq {
            if entry.seq > end {
                return false;
            }
        }
        if let Some(ref caller) = self.caller {
            if &entry.caller != caller {
                return false;
            }
        }
        if let Some(game_id) = self.game_id {
            if entry.event.game_id() != game_id {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if entry.event.kind() != kind {
                return false;
            }
        }
        true
    }
}

/// Summary of events for a caller
#[derive(Debug, Clone)]
pub struct EventSummary {
    /// Total mutations
    pub total: u64,
    /// Mutations by kind
    pub by_kind: HashMap<EventKind, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use interplay_core::{CollectionId, RuleId};

    fn create_test_journal() -> Journal {
        let alice = Principal::new("alice");
        let bob = Principal::new("bob");
        let mut journal = Journal::new();
        journal.start_recording();

        journal.record(&alice, RegistryEvent::GameRegistered { game_id: GameId(1) });
        journal.record(&bob, RegistryEvent::GameRegistered { game_id: GameId(2) });
        journal.record(
            &alice,
            RegistryEvent::CollectionRegistered {
                collection_id: CollectionId(1),
                game_id: GameId(1),
            },
        );
        journal.record(
            &bob,
            RegistryEvent::RuleCreated {
                rule_id: RuleId(1),
                source_collection_id: CollectionId(1),
                target_game_id: GameId(2),
            },
        );
        journal.record(
            &bob,
            RegistryEvent::GameOwnershipTransferred {
                game_id: GameId(2),
                from: bob.clone(),
                to: Principal::new("carol"),
            },
        );
        journal
    }

    #[test]
    fn test_generate_report() {
        let journal = create_test_journal();
        let report = Auditor::new(&journal).generate_report();

        assert_eq!(report.total_entries, 5);
        assert_eq!(report.event_counts[&EventKind::GameRegistered], 2);
        assert_eq!(report.caller_actions[&Principal::new("bob")], 3);
        assert_eq!(report.game_activity[&GameId(2)], 3);

        let text = report.to_string();
        assert!(text.contains("Audit Report"));
        assert!(text.contains("register-game: 2"));
        assert!(text.contains("Sequence range: 0 - 4"));
    }

    #[test]
    fn test_report_kind_order_is_stable() {
        let journal = create_test_journal();
        let text = Auditor::new(&journal).generate_report().to_string();
        let kinds: Vec<_> = text
            .lines()
            .skip_while(|line| *line != "Events by kind:")
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "  register-game: 2",
                "  create-transformation-rule: 1",
                "  register-collection: 1",
                "  transfer-game-ownership: 1",
            ]
        );
    }

    #[test]
    fn test_query_filters() {
        let journal = create_test_journal();
        let auditor = Auditor::new(&journal);

        let by_bob = auditor.query(&AuditQuery {
            caller: Some(Principal::new("bob")),
            ..Default::default()
        });
        assert_eq!(by_bob.len(), 3);

        let game_one = auditor.query(&AuditQuery {
            game_id: Some(GameId(1)),
            ..Default::default()
        });
        assert_eq!(game_one.len(), 2);

        let rules = auditor.query(&AuditQuery {
            kind: Some(EventKind::RuleCreated),
            start_seq: Some(1),
            end_seq: Some(3),
            ..Default::default()
        });
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].seq, 3);
    }

    #[test]
    fn test_caller_summary() {
        let journal = create_test_journal();
        let summary = Auditor::new(&journal).caller_summary(&Principal::new("alice"));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.by_kind[&EventKind::CollectionRegistered], 1);
        assert_eq!(
            Auditor::new(&journal).count_kind(EventKind::GameOwnershipTransferred),
            1
        );
    }

    #[test]
    fn test_ownership_chain() {
        let journal = create_test_journal();
        let auditor = Auditor::new(&journal);
        let chain: Vec<_> = auditor
            .ownership_chain(GameId(2))
            .into_iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(chain, vec!["bob", "carol"]);
        assert!(auditor.ownership_chain(GameId(1)).is_empty());
    }
}
