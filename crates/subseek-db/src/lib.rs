//! subseek-db: SQLite persistence for the subtitle index.
//!
//! This crate provides connection pooling, embedded migrations (including
//! the FTS5 table), typed models, and query modules for subtitle files,
//! dialogue lines and index statistics.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
