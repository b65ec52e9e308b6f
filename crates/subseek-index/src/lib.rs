//! subseek-index: building and querying the subtitle index.
//!
//! [`build_index`] wipes the store and repopulates it from a directory of
//! ASS files; [`search`] runs the two-pass phrase/substring lookup with
//! neighbouring lines attached; [`get_statistics`] summarizes coverage per
//! season.

pub mod builder;
pub mod search;
pub mod stats;

pub use builder::{build_index, BuildOptions, BuildReport};
pub use search::{search, SearchHit};
pub use stats::{get_statistics, IndexStats, SeasonStats};
