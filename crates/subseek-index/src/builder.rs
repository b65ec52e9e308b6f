//! Destructive index rebuild from a directory of subtitle files.
//!
//! The whole rebuild runs in one transaction: the old index stays visible to
//! readers until the new one commits. Each file gets its own savepoint so a
//! file that fails half-way leaves no partial rows behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rusqlite::Connection;
use serde::Serialize;
use subseek_core::config::IndexConfig;
use subseek_core::{Error, Result, SeasonEpisode};
use subseek_db::models::NewDialogue;
use subseek_db::queries::{dialogues, files};
use subseek_parser::{parse_file, parse_season_episode, Dialogue};

/// Which files a rebuild picks up.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Extensions without the leading dot, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["ass".into()],
        }
    }
}

impl From<&IndexConfig> for BuildOptions {
    fn from(config: &IndexConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
        }
    }
}

impl BuildOptions {
    fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Outcome counters for one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub files_seen: usize,
    pub files_indexed: usize,
    /// Files without an `S##E##` tag in their name.
    pub files_skipped: usize,
    /// Files that could not be decoded or stored.
    pub files_failed: usize,
    pub dialogues_indexed: usize,
}

/// Wipe the index and rebuild it from the subtitle files in `source_dir`.
///
/// Only regular files directly inside `source_dir` are considered, in
/// lexicographic filename order. Per-file problems are logged and counted;
/// only a missing directory or a store failure aborts the build.
pub fn build_index(conn: &Connection, source_dir: &Path, options: &BuildOptions) -> Result<BuildReport> {
    if !source_dir.is_dir() {
        return Err(Error::not_found("source directory", source_dir.display()));
    }

    let started = Instant::now();
    let paths = collect_subtitle_files(source_dir, options);
    let total = paths.len();
    tracing::info!(
        dir = %source_dir.display(),
        files = total,
        "Rebuilding subtitle index"
    );

    let mut report = BuildReport {
        files_seen: total,
        ..BuildReport::default()
    };

    let mut tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    dialogues::clear_index(&tx)?;

    for (i, path) in paths.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!("Indexing file {}/{}: {name}", i + 1, total);

        let Some(tag) = parse_season_episode(&name) else {
            tracing::warn!(file = %name, "No season/episode tag in filename, skipping");
            report.files_skipped += 1;
            continue;
        };

        let lines = match parse_file(path) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Failed to read subtitle file");
                report.files_failed += 1;
                continue;
            }
        };

        let sp = tx.savepoint().map_err(|e| Error::database(e.to_string()))?;
        match store_file(&sp, &name, path, tag, &lines) {
            Ok(()) => {
                sp.commit().map_err(|e| Error::database(e.to_string()))?;
                report.files_indexed += 1;
                report.dialogues_indexed += lines.len();
                tracing::debug!(file = %name, %tag, dialogues = lines.len(), "Indexed file");
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Failed to store subtitle file");
                report.files_failed += 1;
            }
        }
    }

    dialogues::rebuild_fts(&tx)?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    tracing::info!(
        indexed = report.files_indexed,
        skipped = report.files_skipped,
        failed = report.files_failed,
        dialogues = report.dialogues_indexed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Subtitle index rebuilt"
    );

    Ok(report)
}

fn collect_subtitle_files(dir: &Path, options: &BuildOptions) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "Error reading subtitle directory");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && options.accepts(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn store_file(
    conn: &Connection,
    name: &str,
    path: &Path,
    tag: SeasonEpisode,
    lines: &[Dialogue],
) -> Result<()> {
    let file = files::insert_file(
        conn,
        name,
        &path.to_string_lossy(),
        tag.season,
        tag.episode,
    )?;

    for (index, line) in lines.iter().enumerate() {
        dialogues::insert_dialogue(
            conn,
            file.id,
            &NewDialogue {
                dialogue_index: index as i64,
                start_time: &line.start_time,
                end_time: &line.end_time,
                chinese_text: &line.chinese_text,
                english_text: &line.english_text,
                raw_text: &line.raw_text,
            },
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use subseek_db::pool::init_memory_pool;

    fn script(lines: &[(&str, &str)]) -> String {
        let mut out = String::from("[Script Info]\nScriptType: v4.00+\n\n[Events]\n");
        for (i, (zh, en)) in lines.iter().enumerate() {
            out.push_str(&format!(
                "Dialogue: 0,0:00:{:02}.00,0:00:{:02}.50,Default,,0,0,0,,{zh}\\N{en}\n",
                i,
                i + 1
            ));
        }
        out
    }

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Show.S01E01.ass"),
            script(&[("你好", "Hello"), ("谢尔顿", "Sheldon"), ("再见", "Bye")]),
        )
        .unwrap();
        fs::write(
            dir.path().join("Show.S01E02.ASS"),
            script(&[("早上好", "Good morning")]),
        )
        .unwrap();
        fs::write(dir.path().join("extras.ass"), script(&[("花絮", "Extras")])).unwrap();
        fs::write(dir.path().join("Show.S01E03.ass"), b"\xFF\x00 not a script").unwrap();
        fs::write(dir.path().join("Show.S01E04.srt"), "1\n00:00:01,000 --> 00:00:02,000\nhi\n").unwrap();
        dir
    }

    #[test]
    fn counts_indexed_skipped_and_failed() {
        let dir = fixture_dir();
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let report = build_index(&conn, dir.path(), &BuildOptions::default()).unwrap();
        assert_eq!(
            report,
            BuildReport {
                files_seen: 4,
                files_indexed: 2,
                files_skipped: 1,
                files_failed: 1,
                dialogues_indexed: 4,
            }
        );
        assert_eq!(files::count_files(&conn).unwrap(), 2);
        assert_eq!(dialogues::count_dialogues(&conn).unwrap(), 4);
    }

    #[test]
    fn positions_are_contiguous_per_file() {
        let dir = fixture_dir();
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        build_index(&conn, dir.path(), &BuildOptions::default()).unwrap();

        for file in files::list_files(&conn).unwrap() {
            let rows = dialogues::list_by_file(&conn, file.id).unwrap();
            let positions: Vec<i64> = rows.iter().map(|r| r.dialogue_index).collect();
            let expected: Vec<i64> = (0..rows.len() as i64).collect();
            assert_eq!(positions, expected, "{}", file.filename);
        }
    }

    #[test]
    fn file_metadata_comes_from_the_name() {
        let dir = fixture_dir();
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        build_index(&conn, dir.path(), &BuildOptions::default()).unwrap();

        let indexed = files::list_files(&conn).unwrap();
        let names: Vec<_> = indexed.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["Show.S01E01.ass", "Show.S01E02.ASS"]);
        assert_eq!((indexed[1].season, indexed[1].episode), (1, 2));
        assert!(indexed[0].file_path.ends_with("Show.S01E01.ass"));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let dir = fixture_dir();
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let snapshot = |conn: &Connection| -> Vec<(String, i64, String, String)> {
            let mut out = Vec::new();
            for file in files::list_files(conn).unwrap() {
                for row in dialogues::list_by_file(conn, file.id).unwrap() {
                    out.push((
                        file.filename.clone(),
                        row.dialogue_index,
                        row.chinese_text,
                        row.english_text,
                    ));
                }
            }
            out
        };

        let first_report = build_index(&conn, dir.path(), &BuildOptions::default()).unwrap();
        let first = snapshot(&*conn);
        let second_report = build_index(&conn, dir.path(), &BuildOptions::default()).unwrap();
        let second = snapshot(&*conn);

        assert_eq!(first_report, second_report);
        assert_eq!(first, second);
    }

    #[test]
    fn rebuild_drops_stale_rows() {
        let dir = fixture_dir();
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        build_index(&conn, dir.path(), &BuildOptions::default()).unwrap();

        let empty = tempfile::tempdir().unwrap();
        let report = build_index(&conn, empty.path(), &BuildOptions::default()).unwrap();
        assert_eq!(report, BuildReport::default());
        assert_eq!(files::count_files(&conn).unwrap(), 0);
        assert!(dialogues::fts_match_ids(&conn, "\"hello\"", 10).unwrap().is_empty());
    }

    #[test]
    fn fts_is_populated_after_build() {
        let dir = fixture_dir();
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        build_index(&conn, dir.path(), &BuildOptions::default()).unwrap();

        assert_eq!(dialogues::fts_match_ids(&conn, "\"good morning\"", 10).unwrap().len(), 1);
    }

    #[test]
    fn subdirectories_are_not_scanned() {
        let dir = fixture_dir();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("Show.S02E01.ass"), script(&[("嵌套", "Nested")])).unwrap();

        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let report = build_index(&conn, dir.path(), &BuildOptions::default()).unwrap();
        assert_eq!(report.files_indexed, 2);
    }

    #[test]
    fn custom_extensions_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("S01E01.ssa"), script(&[("一", "One")])).unwrap();
        fs::write(dir.path().join("S01E02.ass"), script(&[("二", "Two")])).unwrap();

        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let options = BuildOptions {
            extensions: vec![".SSA".into()],
        };
        let report = build_index(&conn, dir.path(), &options).unwrap();
        assert_eq!(report.files_seen, 1);
        assert_eq!(report.files_indexed, 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let err = build_index(&conn, Path::new("/nonexistent/subs"), &BuildOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
