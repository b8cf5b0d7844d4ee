//! Interplay DB - Persistent registry store using native_db
//!
//! Provides a [`Store`] that implements `interplay_core::RegistryStore`:
//! - Game, collection, and transformation rule tables
//! - Both reverse indexes and the ID counters
//! - Snapshot import/export to and from `interplay_core::MemoryStore`
//! - Uncapped secondary-key queries (games by owner, collections by game,
//!   rules by target game)

mod error;
mod models;
mod queries;
mod store;

pub use error::{Error, Result};
pub use store::Store;
