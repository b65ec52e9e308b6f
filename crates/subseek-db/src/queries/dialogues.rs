//! Dialogue line storage, full-text lookup and neighbour queries.

use rusqlite::Connection;
use subseek_core::{Error, Result};

use crate::models::{DialogueMatch, DialogueRow, DialogueText, NewDialogue};

const COLS: &str =
    "id, file_id, dialogue_index, start_time, end_time, chinese_text, english_text, raw_text";

const MATCH_COLS: &str = "d.id, d.file_id, d.dialogue_index, d.start_time, d.end_time, \
     d.chinese_text, d.english_text, f.filename, f.season, f.episode";

/// Ids per `IN (...)` batch when fetching matches, well under SQLite's
/// bound-parameter ceiling.
const FETCH_BATCH: usize = 500;

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Insert one dialogue line for a file.
pub fn insert_dialogue(conn: &Connection, file_id: i64, line: &NewDialogue<'_>) -> Result<i64> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO dialogues
                (file_id, dialogue_index, start_time, end_time, chinese_text, english_text, raw_text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    stmt.execute(rusqlite::params![
        file_id,
        line.dialogue_index,
        line.start_time,
        line.end_time,
        line.chinese_text,
        line.english_text,
        line.raw_text,
    ])
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(conn.last_insert_rowid())
}

/// List a file's dialogue lines in position order.
pub fn list_by_file(conn: &Connection, file_id: i64) -> Result<Vec<DialogueRow>> {
    let q = format!("SELECT {COLS} FROM dialogues WHERE file_id = ?1 ORDER BY dialogue_index ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([file_id], DialogueRow::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Count stored dialogue lines.
pub fn count_dialogues(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM dialogues", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// Empty the FTS index, the dialogue table and the file table.
pub fn clear_index(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "INSERT INTO dialogues_fts(dialogues_fts) VALUES('delete-all');
         DELETE FROM dialogues;
         DELETE FROM files;",
    )
    .map_err(|e| Error::database(format!("Failed to clear index: {e}")))
}

/// Regenerate the FTS index from the current contents of `dialogues`.
pub fn rebuild_fts(conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO dialogues_fts(dialogues_fts) VALUES('rebuild')", [])
        .map_err(|e| Error::database(format!("Failed to rebuild full-text index: {e}")))?;
    Ok(())
}

/// Ids of lines matching an FTS5 query expression, at most `limit`.
///
/// The expression goes to `MATCH` as-is, so callers quote it themselves.
/// A malformed expression surfaces as a database error.
pub fn fts_match_ids(conn: &Connection, expression: &str, limit: usize) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare_cached("SELECT rowid FROM dialogues_fts WHERE dialogues_fts MATCH ?1 LIMIT ?2")
        .map_err(|e| Error::database(e.to_string()))?;
    let ids = stmt
        .query_map(rusqlite::params![expression, sql_limit(limit)], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<i64>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(ids)
}

/// Ids of lines whose Chinese or English text contains `needle`, at most
/// `limit`. `%` and `_` in the needle match literally.
///
/// SQLite's `LIKE` only folds ASCII case, so `hello` finds `Hello` but
/// `école` does not find `ÉCOLE`.
pub fn substring_match_ids(conn: &Connection, needle: &str, limit: usize) -> Result<Vec<i64>> {
    let pattern = format!("%{}%", escape_like(needle));
    let mut stmt = conn
        .prepare_cached(
            "SELECT id FROM dialogues
             WHERE chinese_text LIKE ?1 ESCAPE '\\' OR english_text LIKE ?1 ESCAPE '\\'
             LIMIT ?2",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let ids = stmt
        .query_map(rusqlite::params![pattern, sql_limit(limit)], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<i64>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(ids)
}

/// Escape `LIKE` wildcards with a backslash.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Fetch lines joined with their file metadata.
///
/// Rows come back in no particular order; ids that do not exist are
/// silently absent.
pub fn fetch_matches(conn: &Connection, ids: &[i64]) -> Result<Vec<DialogueMatch>> {
    let mut out = Vec::with_capacity(ids.len());

    for batch in ids.chunks(FETCH_BATCH) {
        let placeholders = vec!["?"; batch.len()].join(", ");
        let q = format!(
            "SELECT {MATCH_COLS}
             FROM dialogues d
             JOIN files f ON d.file_id = f.id
             WHERE d.id IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(batch), DialogueMatch::from_row)
            .map_err(|e| Error::database(e.to_string()))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::database(e.to_string()))?;
        out.extend(rows);
    }

    Ok(out)
}

/// The nearest line before `dialogue_index` in the same file.
pub fn previous_line(conn: &Connection, file_id: i64, dialogue_index: i64) -> Result<Option<DialogueText>> {
    neighbour(
        conn,
        "SELECT chinese_text, english_text FROM dialogues
         WHERE file_id = ?1 AND dialogue_index < ?2
         ORDER BY dialogue_index DESC LIMIT 1",
        file_id,
        dialogue_index,
    )
}

/// The nearest line after `dialogue_index` in the same file.
pub fn next_line(conn: &Connection, file_id: i64, dialogue_index: i64) -> Result<Option<DialogueText>> {
    neighbour(
        conn,
        "SELECT chinese_text, english_text FROM dialogues
         WHERE file_id = ?1 AND dialogue_index > ?2
         ORDER BY dialogue_index ASC LIMIT 1",
        file_id,
        dialogue_index,
    )
}

fn neighbour(conn: &Connection, sql: &str, file_id: i64, dialogue_index: i64) -> Result<Option<DialogueText>> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let mut rows = stmt
        .query_map([file_id, dialogue_index], DialogueText::from_row)
        .map_err(|e| Error::database(e.to_string()))?;
    match rows.next() {
        Some(Ok(text)) => Ok(Some(text)),
        Some(Err(e)) => Err(Error::database(e.to_string())),
        None => Ok(None),
    }
}
