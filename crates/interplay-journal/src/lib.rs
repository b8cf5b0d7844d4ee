//! Interplay Journal - Auditing and export for the registry journal
//!
//! This crate builds on `interplay-core`'s journal to provide:
//!
//! - **Auditor**: Query and summarize recorded mutations by caller, game, or kind
//! - **Exporter**: Export journal data to RON, JSON, CSV, or plain text
//!
//! # Example
//!
//! ```rust,ignore
//! use interplay_core::{JournalConfig, Registry, RegistryConfig};
//! use interplay_journal::{Auditor, Exporter};
//!
//! let config = RegistryConfig::default().with_journal(JournalConfig {
//!     recording_enabled: true,
//!     ..Default::default()
//! });
//! let mut registry = Registry::in_memory(config)?;
//! registry.register_game(&alice, name, description, None)?;
//!
//! let report = Auditor::new(registry.journal()).generate_report();
//! println!("{}", report);
//!
//! let csv = Exporter::new(registry.journal()).to_csv()?;
//! ```

mod auditor;
mod error;
mod exporter;

pub use auditor::{AuditQuery, AuditReport, Auditor, EventSummary};
pub use error::{Error, Result};
pub use exporter::{ExportFormat, Exporter};

// Re-export core journal types for convenience
pub use interplay_core::{
    EventKind, Journal, JournalConfig, JournalEntry, JournalStats, RegistryEvent,
};
