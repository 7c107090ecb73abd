//! Record store loader — reads the directory of per-record JSON documents.
//!
//! The store is owned by an external producer; this side only reads.
//! One corrupt document never aborts a load: it is logged and skipped.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::record::Record;

pub struct RecordStore {
    data_dir: PathBuf,
    load_timeout: Duration,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>, load_timeout: Duration) -> Self {
        Self {
            data_dir: data_dir.into(),
            load_timeout,
        }
    }

    /// Load every record in the store, newest first.
    ///
    /// A missing directory is an empty store, not an error. Files are
    /// parsed in parallel; the timestamp sort re-imposes order afterwards.
    /// Files still unparsed when the load deadline passes are skipped.
    pub fn load_all(&self) -> Vec<Record> {
        let paths = self.record_paths();
        if paths.is_empty() {
            tracing::debug!(dir = %self.data_dir.display(), "Record store empty or missing");
            return Vec::new();
        }

        let started = Instant::now();
        let deadline = self.load_timeout;

        let mut records: Vec<Record> = paths
            .par_iter()
            .filter_map(|path| {
                if started.elapsed() > deadline {
                    tracing::warn!(file = %path.display(), "Load deadline exceeded, skipping");
                    return None;
                }
                parse_record_file(path)
            })
            .collect();

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        tracing::info!(
            loaded = records.len(),
            files = paths.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Record store loaded"
        );
        records
    }

    /// Summed on-disk size of the record documents.
    pub fn storage_size_bytes(&self) -> u64 {
        self.record_paths()
            .iter()
            .filter_map(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .sum()
    }

    fn record_paths(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.data_dir) {
            Ok(e) => e,
            Err(_) => return Vec::new(),
        };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|x| x.to_str()) == Some("json"))
            .collect()
    }
}

fn parse_record_file(path: &Path) -> Option<Record> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Could not read record file");
            return None;
        }
    };
    match serde_json::from_str::<Record>(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Could not parse record, skipping");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Speaker;
    use crate::test_helpers::{write_record_file, RecordBuilder};
    use chrono::{TimeZone, Utc};

    fn store(dir: &Path) -> RecordStore {
        RecordStore::new(dir, Duration::from_secs(10))
    }

    #[test]
    fn test_missing_directory_is_empty_store() {
        let s = store(Path::new("/nonexistent/journal/records"));
        assert!(s.load_all().is_empty());
        assert_eq!(s.storage_size_bytes(), 0);
    }

    #[test]
    fn test_load_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        for (i, day) in [2, 1, 3].iter().enumerate() {
            let rec = RecordBuilder::new()
                .id(&format!("r-{}", i))
                .timestamp(Utc.with_ymd_and_hms(2026, 4, *day, 12, 0, 0).unwrap())
                .build();
            write_record_file(dir.path(), &rec);
        }

        let records = store(dir.path()).load_all();
        assert_eq!(records.len(), 3);
        assert!(records[0].timestamp > records[1].timestamp);
        assert!(records[1].timestamp > records[2].timestamp);
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let rec = RecordBuilder::new().id("good").build();
        write_record_file(dir.path(), &rec);
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored entirely").unwrap();

        let records = store(dir.path()).load_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "good");
    }

    #[test]
    fn test_accepts_both_timestamp_forms() {
        let dir = tempfile::tempdir().unwrap();
        let zoned = r#"{"id":"z","timestamp":"2026-04-03T10:00:00Z","sender":"client","content":"a"}"#;
        let bare = r#"{"id":"b","timestamp":"2026-04-02T10:00:00","sender":"therapist","content":"b"}"#;
        std::fs::write(dir.path().join("z.json"), zoned).unwrap();
        std::fs::write(dir.path().join("b.json"), bare).unwrap();

        let records = store(dir.path()).load_all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "z");
        assert_eq!(records[1].sender, Speaker::Therapist);
    }

    #[test]
    fn test_storage_size_counts_json_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "12345").unwrap();
        std::fs::write(dir.path().join("b.json"), "123").unwrap();
        std::fs::write(dir.path().join("c.log"), "xxxxxxxxxx").unwrap();
        assert_eq!(store(dir.path()).storage_size_bytes(), 8);
    }
}
