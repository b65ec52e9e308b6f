//! # subseek-av
//!
//! ffmpeg plumbing for cutting audio and video clips around a subtitle line.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find ffmpeg via config or `PATH`.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Clip extraction** ([`ClipExtractor`]) -- locate the episode's source
//!   media, compute the padded window and run ffmpeg.
//! - **Temp-file pruning** ([`cleanup`]) -- age and count limits for the
//!   clip output directories.

pub mod cleanup;
pub mod clips;
pub mod command;
pub mod template;
pub mod tools;

// ---- Re-exports for convenience ----

pub use clips::{ClipExtractor, ClipOutput, ClipWindow};
pub use command::{ToolCommand, ToolOutput};
pub use template::EpisodeTemplate;
pub use tools::{ToolInfo, ToolRegistry};
