//! Shared application state.
//!
//! [`AppContext`] is handed to every route handler through Axum state. All
//! fields are cheap to clone.

use std::sync::Arc;

use subseek_av::{ClipExtractor, ToolRegistry};
use subseek_core::config::Config;
use subseek_db::pool::DbPool;

#[derive(Clone)]
pub struct AppContext {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub tools: Arc<ToolRegistry>,
    pub clips: Arc<ClipExtractor>,
}

impl AppContext {
    /// Assemble a context, discovering tools from `config`.
    pub fn new(db: DbPool, config: Config) -> Self {
        let tools = Arc::new(ToolRegistry::discover(&config.tools));
        Self::with_tools(db, config, tools)
    }

    /// Assemble a context around an already-built tool registry.
    pub fn with_tools(db: DbPool, config: Config, tools: Arc<ToolRegistry>) -> Self {
        let clips = Arc::new(ClipExtractor::new(config.clips.clone(), tools.clone()));
        Self {
            db,
            config: Arc::new(config),
            tools,
            clips,
        }
    }
}
