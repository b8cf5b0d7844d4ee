//! Export journal data to various formats

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use interplay_core::{Journal, JournalEntry, JournalStats, RegistryEvent};
use serde::Serialize;
use std::io::Write;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// RON format (Rust Object Notation)
    Ron,
    /// JSON format (requires serde_json feature)
    Json,
    /// CSV format, one row per entry
    Csv,
    /// Human-readable text format
    Text,
}

/// Exporter for journal data
pub struct Exporter<'a> {
    journal: &'a Journal,
}

impl<'a> Exporter<'a> {
    /// Create a new exporter
    pub fn new(journal: &'a Journal) -> Self {
        Self { journal }
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Ron => self.to_ron(),
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Export to RON format
    pub fn to_ron(&self) -> Result<String> {
        let export = ExportData::from_journal(self.journal);
        ron::ser::to_string_pretty(&export, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Export to JSON format
    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String> {
        let export = ExportData::from_journal(self.journal);
        serde_json::to_string_pretty(&export).map_err(|e| Error::Serialization(e.to_string()))
    }

    #[cfg(not(feature = "serde_json"))]
    pub fn to_json(&self) -> Result<String> {
        Err(Error::ExportError(
            "JSON export requires the 'serde_json' feature".to_string(),
        ))
    }

    /// Export to CSV format
    pub fn to_csv(&self) -> Result<String> {
        let mut output = String::new();
        output.push_str("seq,kind,caller,game_id,subject_id,details\n");

        for entry in self.journal.entries() {
            let (subject, details) = describe(&entry.event);
            output.push_str(&format!(
                "{},{},{},{},{},\"{}\"\n",
                entry.seq,
                entry.event.kind(),
                csv_field(entry.caller.as_str()),
                entry.event.game_id().raw(),
                subject,
                details.replace('"', "\"\"")
            ));
        }

        Ok(output)
    }

    /// Export to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        let stats = self.journal.stats();

        output.push_str("=== Journal Export ===\n\n");
        output.push_str(&format!("Total entries: {}\n", stats.total_entries));
        output.push_str(&format!("Games registered: {}\n", stats.game_registered));
        output.push_str(&format!(
            "Collections registered: {}\n",
            stats.collection_registered
        ));
        output.push_str(&format!("Rules created: {}\n", stats.rule_created));

        if let (Some(first), Some(last)) = (stats.first_seq, stats.last_seq) {
            output.push_str(&format!("Sequence range: {} - {}\n", first, last));
        }

        output.push_str("\n=== Entries ===\n\n");

        for entry in self.journal.entries() {
            let (subject, details) = describe(&entry.event);
            output.push_str(&format!(
                "  #{} {} by {} ({})\n",
                entry.seq,
                entry.event.kind(),
                entry.caller,
                subject
            ));
            if !details.is_empty() {
                output.push_str(&format!("      {}\n", details));
            }
        }

        output
    }

    /// Export only entries in a sequence range (inclusive)
    pub fn export_range(&self, start: u64, end: u64, format: ExportFormat) -> Result<String> {
        if start > end {
            return Err(Error::InvalidRange(start, end));
        }
        let entries: Vec<_> = self
            .journal
            .entries_in_range(start, end)
            .into_iter()
            .cloned()
            .collect();
        let filtered = FilteredExport {
            exported_at: Utc::now(),
            entries,
        };

        match format {
            ExportFormat::Ron => {
                ron::ser::to_string_pretty(&filtered, ron::ser::PrettyConfig::default())
                    .map_err(|e| Error::Serialization(e.to_string()))
            }
            #[cfg(feature = "serde_json")]
            ExportFormat::Json => serde_json::to_string_pretty(&filtered)
                .map_err(|e| Error::Serialization(e.to_string())),
            #[cfg(not(feature = "serde_json"))]
            ExportFormat::Json => Err(Error::ExportError(
                "JSON export requires the 'serde_json' feature".to_string(),
            )),
            _ => Err(Error::ExportError(
                "Range export only supports RON and JSON".to_string(),
            )),
        }
    }
}

/// Subject id and extra details of an event, for flat formats
fn describe(event: &RegistryEvent) -> (String, String) {
    match event {
        RegistryEvent::GameRegistered { game_id } | RegistryEvent::GameUpdated { game_id } => {
            (game_id.to_string(), String::new())
        }
        RegistryEvent::GameOwnershipTransferred { game_id, from, to } => {
            (game_id.to_string(), format!("from={} to={}", from, to))
        }
        RegistryEvent::CollectionRegistered { collection_id, .. }
        | RegistryEvent::CollectionUpdated { collection_id, .. } => {
            (collection_id.to_string(), String::new())
        }
        RegistryEvent::RuleCreated {
            rule_id,
            source_collection_id,
            ..
        } => (rule_id.to_string(), format!("source={}", source_collection_id)),
        RegistryEvent::RuleUpdated { rule_id, .. } => (rule_id.to_string(), String::new()),
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Data structure for full journal export
#[derive(Debug, Clone, Serialize)]
struct ExportData {
    version: u32,
    exported_at: DateTime<Utc>,
    stats: ExportStats,
    entries: Vec<JournalEntry>,
}

impl ExportData {
    fn from_journal(journal: &Journal) -> Self {
        Self {
            version: 1,
            exported_at: Utc::now(),
            stats: ExportStats::from(journal.stats()),
            entries: journal.entries().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ExportStats {
    total_entries: usize,
    game_registered: usize,
    game_updated: usize,
    ownership_transferred: usize,
    collection_registered: usize,
    collection_updated: usize,
    rule_created: usize,
    rule_updated: usize,
    first_seq: Option<u64>,
    last_seq: Option<u64>,
}

impl From<JournalStats> for ExportStats {
    fn from(stats: JournalStats) -> Self {
        Self {
            total_entries: stats.total_entries,
            game_registered: stats.game_registered,
            game_updated: stats.game_updated,
            ownership_transferred: stats.ownership_transferred,
            collection_registered: stats.collection_registered,
            collection_updated: stats.collection_updated,
            rule_created: stats.rule_created,
            rule_updated: stats.rule_updated,
            first_seq: stats.first_seq,
            last_seq: stats.last_seq,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct FilteredExport {
    exported_at: DateTime<Utc>,
    entries: Vec<JournalEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use interplay_core::{
        Description, JournalConfig, Name, Principal, Registry, RegistryConfig, RuleData, RuleType,
    };

    fn create_test_journal() -> Journal {
        let alice = Principal::new("alice");
        let bob = Principal::new("bob,jr");
        let config = RegistryConfig::default().with_journal(JournalConfig {
            recording_enabled: true,
            ..Default::default()
        });
        let mut registry = Registry::in_memory(config).unwrap();

        let alpha = registry
            .register_game(
                &alice,
                Name::new("Alpha").unwrap(),
                Description::new("").unwrap(),
                None,
            )
            .unwrap();
        let beta = registry
            .register_game(
                &bob,
                Name::new("Beta").unwrap(),
                Description::new("").unwrap(),
                None,
            )
            .unwrap();
        let swords = registry
            .register_collection(
                &alice,
                alpha,
                Principal::new("SP000.swords"),
                Name::new("Swords").unwrap(),
                Description::new("").unwrap(),
                None,
            )
            .unwrap();
        registry
            .create_transformation_rule(
                &bob,
                swords,
                beta,
                RuleType::new("reskin").unwrap(),
                RuleData::new("{}").unwrap(),
                None,
            )
            .unwrap();
        registry
            .transfer_game_ownership(&alice, alpha, Principal::new("carol"))
            .unwrap();

        registry.journal().clone()
    }

    #[test]
    fn test_export_ron() {
        let journal = create_test_journal();
        let exporter = Exporter::new(&journal);
        let ron = exporter.to_ron().unwrap();

        assert!(ron.contains("version"));
        assert!(ron.contains("exported_at"));
        assert!(ron.contains("entries"));
        assert!(ron.contains("RuleCreated"));
    }

    #[test]
    fn test_export_csv() {
        let journal = create_test_journal();
        let exporter = Exporter::new(&journal);
        let csv = exporter.to_csv().unwrap();

        assert!(csv.starts_with("seq,kind,caller,game_id,subject_id,details\n"));
        assert_eq!(csv.lines().count(), 6);
        assert!(csv.contains("\"bob,jr\""));
        assert!(csv.contains("transfer-game-ownership"));
    }

    #[test]
    fn test_export_text() {
        let journal = create_test_journal();
        let exporter = Exporter::new(&journal);
        let text = exporter.to_text();

        assert!(text.contains("Journal Export"));
        assert!(text.contains("Games registered: 2"));
        assert!(text.contains("from=alice to=carol"));
    }

    #[test]
    fn test_export_to_writer() {
        let journal = create_test_journal();
        let mut buffer = Vec::new();
        Exporter::new(&journal)
            .export_to(&mut buffer, ExportFormat::Text)
            .unwrap();
        assert!(String::from_utf8(buffer).unwrap().contains("=== Entries ==="));
    }

    #[test]
    fn test_export_range() {
        let journal = create_test_journal();
        let exporter = Exporter::new(&journal);
        let ron = exporter.export_range(1, 2, ExportFormat::Ron).unwrap();

        assert!(ron.contains("entries"));
        assert!(ron.contains("CollectionRegistered"));
        assert!(!ron.contains("RuleCreated"));
        assert!(matches!(
            exporter.export_range(3, 1, ExportFormat::Ron),
            Err(Error::InvalidRange(3, 1))
        ));
        assert!(exporter.export_range(0, 4, ExportFormat::Csv).is_err());
    }

    #[cfg(not(feature = "serde_json"))]
    #[test]
    fn test_json_requires_feature() {
        let journal = create_test_journal();
        assert!(matches!(
            Exporter::new(&journal).to_json(),
            Err(Error::ExportError(_))
        ));
    }
}
