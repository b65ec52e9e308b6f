//! Pruning of generated clip files.
//!
//! Both functions only touch regular files carrying the given extension
//! directly inside `dir`. A missing directory counts as empty. Failures to
//! inspect or delete one file are logged and the rest continue.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

fn clip_files(dir: &Path, extension: &str) -> Vec<(PathBuf, SystemTime)> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to list clip directory");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if !matches {
                return None;
            }
            let meta = entry.metadata().ok()?;
            if !meta.is_file() {
                return None;
            }
            Some((path, meta.modified().ok()?))
        })
        .collect()
}

fn remove(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(file = %path.display(), "Removed clip");
            true
        }
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Failed to remove clip");
            false
        }
    }
}

/// Delete clips whose modification time is older than `max_age`.
/// Returns how many were removed.
pub fn cleanup_older_than(dir: &Path, extension: &str, max_age: Duration) -> usize {
    let now = SystemTime::now();
    clip_files(dir, extension)
        .into_iter()
        .filter(|(_, modified)| {
            now.duration_since(*modified)
                .map(|age| age > max_age)
                .unwrap_or(false)
        })
        .filter(|(path, _)| remove(path))
        .count()
}

/// Keep the `max_files` most recently modified clips and delete the rest.
/// Returns how many were removed.
pub fn limit_file_count(dir: &Path, extension: &str, max_files: usize) -> usize {
    let mut files = clip_files(dir, extension);
    if files.len() <= max_files {
        return 0;
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));
    files
        .into_iter()
        .skip(max_files)
        .filter(|(path, _)| remove(path))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn touch(dir: &Path, name: &str, age: Duration) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
        path
    }

    #[test]
    fn old_clips_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let old = touch(dir.path(), "old.mp3", Duration::from_secs(48 * 3600));
        let fresh = touch(dir.path(), "fresh.mp3", Duration::from_secs(60));

        let removed = cleanup_older_than(dir.path(), "mp3", Duration::from_secs(24 * 3600));
        assert_eq!(removed, 1);
        assert!(!old.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn other_extensions_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let keep = touch(dir.path(), "notes.txt", Duration::from_secs(48 * 3600));

        assert_eq!(cleanup_older_than(dir.path(), "mp3", Duration::from_secs(3600)), 0);
        assert_eq!(limit_file_count(dir.path(), "mp3", 0), 0);
        assert!(keep.exists());
    }

    #[test]
    fn newest_clips_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..5u64 {
            paths.push(touch(dir.path(), &format!("clip{i}.mp4"), Duration::from_secs(100 * (i + 1))));
        }

        let removed = limit_file_count(dir.path(), "mp4", 2);
        assert_eq!(removed, 3);
        assert!(paths[0].exists());
        assert!(paths[1].exists());
        assert!(paths[2..].iter().all(|p| !p.exists()));
    }

    #[test]
    fn under_the_limit_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.mp4", Duration::ZERO);
        assert_eq!(limit_file_count(dir.path(), "mp4", 10), 0);
    }

    #[test]
    fn missing_directory_counts_as_empty() {
        let missing = Path::new("/nonexistent/temp_audio");
        assert_eq!(cleanup_older_than(missing, "mp3", Duration::ZERO), 0);
        assert_eq!(limit_file_count(missing, "mp3", 0), 0);
    }

    #[test]
    fn directories_with_matching_names_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("folder.mp3")).unwrap();
        assert_eq!(limit_file_count(dir.path(), "mp3", 0), 0);
    }
}
