//! subseek-core: shared error type, configuration and timecode helpers.
//!
//! Every other subseek-* crate depends on this one. It carries the unified
//! [`Error`], the JSON-backed [`config::Config`], the [`media`] enums shared
//! between the indexer and the clip extractor, and ASS timestamp parsing.

pub mod config;
pub mod error;
pub mod media;
pub mod timecode;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;
