//! Index coverage summary.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use subseek_core::Result;
use subseek_db::queries::{dialogues, files, stats};

/// Episodes present for one season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub episode_count: usize,
    pub episodes: Vec<u32>,
}

/// Totals plus per-season episode coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_files: i64,
    pub total_dialogues: i64,
    pub seasons: BTreeMap<u32, SeasonStats>,
}

pub fn get_statistics(conn: &Connection) -> Result<IndexStats> {
    let mut seasons: BTreeMap<u32, SeasonStats> = BTreeMap::new();
    for tag in stats::distinct_episodes(conn)? {
        let entry = seasons.entry(tag.season).or_default();
        entry.episodes.push(tag.episode);
        entry.episode_count += 1;
    }

    Ok(IndexStats {
        total_files: files::count_files(conn)?,
        total_dialogues: dialogues::count_dialogues(conn)?,
        seasons,
    })
}
