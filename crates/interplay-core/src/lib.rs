//! Interplay Core - Cross-game asset registry
//!
//! This crate provides the registry that lets independent games describe how
//! each other's NFTs behave when brought across:
//! - Games, registered by any caller who then owns them
//! - NFT collections, registered under a game by its owner
//! - Transformation rules, declared by a target game's owner for a source
//!   collection from any game
//!
//! Records live behind the [`RegistryStore`] trait. [`MemoryStore`] keeps
//! them in process; `interplay-db` persists them.
//!
//! ## Journal Feature
//!
//! Enable the `journal` feature to record every committed mutation:
//! ```toml
//! interplay-core = { version = "0.1", features = ["journal"] }
//! ```

mod config;
mod error;
mod identity;
mod index;
mod model;
mod registry;
mod snapshot;
mod store;
mod text;
pub mod write_set;

#[cfg(feature = "journal")]
pub mod journal;

pub use config::RegistryConfig;
pub use error::{Error, IndexKind, Result};
pub use identity::{CollectionId, GameId, Principal, RuleId};
pub use index::{BoundedList, DEFAULT_INDEX_CAPACITY};
pub use model::{Collection, Counters, Game, TransformationRule};
pub use registry::Registry;
pub use snapshot::SnapshotFormat;
pub use store::{MemoryStore, RegistryStore};
pub use text::{BoundedText, Description, MetadataUri, Name, RuleData, RuleType};
pub use write_set::{PendingWrite, WriteSet};

#[cfg(feature = "journal")]
pub use journal::{EventKind, Journal, JournalConfig, JournalEntry, JournalStats, RegistryEvent};
