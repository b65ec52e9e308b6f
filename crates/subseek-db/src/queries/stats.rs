//! Aggregate queries over the index.

use rusqlite::Connection;
use subseek_core::{Error, Result, SeasonEpisode};

/// Distinct (season, episode) pairs present in the index, ascending.
pub fn distinct_episodes(conn: &Connection) -> Result<Vec<SeasonEpisode>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT season, episode FROM files ORDER BY season, episode")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(SeasonEpisode::new(row.get(0)?, row.get(1)?)))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::files::insert_file;

    #[test]
    fn empty_index_has_no_episodes() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        assert!(distinct_episodes(&conn).unwrap().is_empty());
    }

    #[test]
    fn duplicates_collapse_and_order_is_ascending() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        insert_file(&conn, "S02E03.ass", "/x", 2, 3).unwrap();
        insert_file(&conn, "S01E10.ass", "/x", 1, 10).unwrap();
        insert_file(&conn, "S01E02.ass", "/x", 1, 2).unwrap();
        insert_file(&conn, "S01E02.alt.ass", "/x", 1, 2).unwrap();

        assert_eq!(
            distinct_episodes(&conn).unwrap(),
            vec![
                SeasonEpisode::new(1, 2),
                SeasonEpisode::new(1, 10),
                SeasonEpisode::new(2, 3),
            ]
        );
    }
}
