//! Database query modules.

pub mod dialogues;
pub mod files;
pub mod stats;
