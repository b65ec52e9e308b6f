//! Subtitle file records.

use chrono::Utc;
use rusqlite::Connection;
use subseek_core::{Error, Result};

use crate::models::SubtitleFile;

const COLS: &str = "id, filename, file_path, season, episode, indexed_at";

/// Insert a subtitle file record and return it with its assigned id.
pub fn insert_file(
    conn: &Connection,
    filename: &str,
    file_path: &str,
    season: u32,
    episode: u32,
) -> Result<SubtitleFile> {
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO files (filename, file_path, season, episode, indexed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![filename, file_path, season, episode, &now],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(SubtitleFile {
        id: conn.last_insert_rowid(),
        filename: filename.to_string(),
        file_path: file_path.to_string(),
        season,
        episode,
        indexed_at: now,
    })
}

/// List all indexed files ordered by season, episode, then filename.
pub fn list_files(conn: &Connection) -> Result<Vec<SubtitleFile>> {
    let q = format!("SELECT {COLS} FROM files ORDER BY season, episode, filename");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], SubtitleFile::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Count indexed files.
pub fn count_files(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn insert_and_list() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let file = insert_file(&conn, "S01E01.ass", "/subs/S01E01.ass", 1, 1).unwrap();
        assert!(file.id > 0);

        assert_eq!(list_files(&conn).unwrap(), vec![file]);
    }

    #[test]
    fn filename_is_unique() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        insert_file(&conn, "S01E01.ass", "/a/S01E01.ass", 1, 1).unwrap();
        let err = insert_file(&conn, "S01E01.ass", "/b/S01E01.ass", 1, 1).unwrap_err();
        assert!(matches!(err, Error::Database { .. }));
    }

    #[test]
    fn duplicate_season_episode_is_tolerated() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        insert_file(&conn, "S01E01.v1.ass", "/a", 1, 1).unwrap();
        insert_file(&conn, "S01E01.v2.ass", "/b", 1, 1).unwrap();
        assert_eq!(count_files(&conn).unwrap(), 2);
    }

    #[test]
    fn list_is_ordered_by_season_then_episode() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        insert_file(&conn, "S02E01.ass", "/x", 2, 1).unwrap();
        insert_file(&conn, "S01E10.ass", "/x", 1, 10).unwrap();
        insert_file(&conn, "S01E02.ass", "/x", 1, 2).unwrap();

        let names: Vec<_> = list_files(&conn)
            .unwrap()
            .into_iter()
            .map(|f| f.filename)
            .collect();
        assert_eq!(names, ["S01E02.ass", "S01E10.ass", "S02E01.ass"]);
    }
}
