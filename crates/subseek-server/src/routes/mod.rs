//! Route handlers.

pub mod clips;
pub mod root;
pub mod search;
pub mod stats;
