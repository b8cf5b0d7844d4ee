//! Database models for persistent storage.

mod index;
mod records;

pub use index::*;
pub use records::*;
