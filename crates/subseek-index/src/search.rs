//! Two-pass dialogue search.
//!
//! The FTS5 phrase pass handles English well but the default tokenizer
//! treats a run of Han characters as one token, so a partial Chinese query
//! never matches there. The `LIKE` substring pass covers that case. Ids from
//! both passes are unioned before the rows are fetched.

use std::collections::BTreeSet;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use subseek_core::Result;
use subseek_db::models::DialogueMatch;
use subseek_db::queries::dialogues;

/// One matched dialogue line with its neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub season: u32,
    pub episode: u32,
    pub filename: String,
    pub dialogue_index: i64,
    pub start_time: String,
    pub end_time: String,
    pub chinese_text: String,
    pub english_text: String,
    /// Previous line in the same file as `"中文\nEnglish"`.
    pub context_before: Option<String>,
    /// Next line in the same file as `"中文\nEnglish"`.
    pub context_after: Option<String>,
}

/// Wrap a query as a single FTS5 phrase, doubling embedded quotes.
fn fts_phrase(query: &str) -> String {
    format!("\"{}\"", query.replace('"', "\"\""))
}

/// Search the index for `query`, returning at most `limit` hits ordered by
/// season, episode and position.
///
/// A blank query returns nothing. A phrase that FTS5 refuses to parse is
/// treated as having no phrase matches; the substring pass still runs.
pub fn search(conn: &Connection, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let mut ids = BTreeSet::new();

    match dialogues::fts_match_ids(conn, &fts_phrase(&needle), limit) {
        Ok(found) => ids.extend(found),
        Err(e) => tracing::debug!(query = %needle, error = %e, "Phrase pass failed"),
    }
    ids.extend(dialogues::substring_match_ids(conn, &needle, limit)?);

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = ids.into_iter().collect();
    let mut matches = dialogues::fetch_matches(conn, &ids)?;
    matches.sort_by_key(|m| (m.season, m.episode, m.dialogue_index, m.id));
    matches.truncate(limit);

    let hits = matches
        .into_iter()
        .map(|m| attach_context(conn, m))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(query = %needle, hits = hits.len(), "Search complete");
    Ok(hits)
}

fn attach_context(conn: &Connection, m: DialogueMatch) -> Result<SearchHit> {
    let context_before = dialogues::previous_line(conn, m.file_id, m.dialogue_index)?
        .map(|line| line.joined());
    let context_after = dialogues::next_line(conn, m.file_id, m.dialogue_index)?
        .map(|line| line.joined());

    Ok(SearchHit {
        season: m.season,
        episode: m.episode,
        filename: m.filename,
        dialogue_index: m.dialogue_index,
        start_time: m.start_time,
        end_time: m.end_time,
        chinese_text: m.chinese_text,
        english_text: m.english_text,
        context_before,
        context_after,
    })
}
