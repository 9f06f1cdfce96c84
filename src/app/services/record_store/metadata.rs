//! Load statistics for the record store
//!
//! Loading never aborts on bad data, so everything that was skipped or failed
//! is collected here for the caller to report.

use crate::app::models::{RecordId, RecordKind};
use std::path::PathBuf;
use std::time::Duration;

/// One data line that was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the file, header included
    pub line_number: usize,

    /// Why the line was skipped
    pub reason: String,
}

/// Statistics about loading a single collection
#[derive(Debug, Clone)]
pub struct CollectionLoadStats {
    /// Collection the stats belong to
    pub kind: RecordKind,

    /// File the collection was loaded from
    pub path: PathBuf,

    /// Data lines seen, header and blank lines excluded
    pub lines_read: usize,

    /// Records placed in the collection
    pub records_loaded: usize,

    /// Lines that failed to decode
    pub skipped: Vec<SkippedLine>,

    /// IDs that appeared again after their first occurrence
    pub duplicate_ids: Vec<RecordId>,

    /// File-level failure; the collection is empty when set
    pub error: Option<String>,

    /// Time taken to load the collection
    pub load_duration: Duration,
}

impl CollectionLoadStats {
    /// Create new empty load statistics
    pub fn new(kind: RecordKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            lines_read: 0,
            records_loaded: 0,
            skipped: Vec::new(),
            duplicate_ids: Vec::new(),
            error: None,
            load_duration: Duration::ZERO,
        }
    }

    /// Check if the file itself could not be read
    pub fn has_errors(&self) -> bool {
        self.error.is_some()
    }

    /// Check if any line was skipped or dropped as a duplicate
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty() || !self.duplicate_ids.is_empty()
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        match &self.error {
            Some(error) => format!("{}: not loaded ({})", self.kind, error),
            None => format!(
                "{}: loaded {} of {} lines ({} skipped, {} duplicate IDs) in {:.2}s",
                self.kind,
                self.records_loaded,
                self.lines_read,
                self.skipped.len(),
                self.duplicate_ids.len(),
                self.load_duration.as_secs_f64()
            ),
        }
    }
}

/// Statistics for a whole store load, one entry per collection
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub collections: Vec<CollectionLoadStats>,

    /// Data files that did not exist and were created with a header
    pub created_files: Vec<PathBuf>,

    /// Files that could not be created
    pub errors: Vec<String>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for one collection
    pub fn for_kind(&self, kind: RecordKind) -> Option<&CollectionLoadStats> {
        self.collections.iter().find(|stats| stats.kind == kind)
    }

    /// Total records loaded across collections
    pub fn total_records(&self) -> usize {
        self.collections.iter().map(|stats| stats.records_loaded).sum()
    }

    /// Total lines skipped across collections
    pub fn total_skipped(&self) -> usize {
        self.collections.iter().map(|stats| stats.skipped.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.collections.iter().any(CollectionLoadStats::has_errors)
    }

    pub fn has_warnings(&self) -> bool {
        self.collections.iter().any(CollectionLoadStats::has_warnings)
    }

    pub fn summary(&self) -> String {
        format!(
            "Loaded {} records from {} files ({} lines skipped, {} files created)",
            self.total_records(),
            self.collections.len(),
            self.total_skipped(),
            self.created_files.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_stats_new() {
        let stats = CollectionLoadStats::new(RecordKind::City, "City.list.csv");
        assert_eq!(stats.records_loaded, 0);
        assert!(!stats.has_errors());
        assert!(!stats.has_warnings());
    }

    #[test]
    fn test_collection_stats_summary() {
        let mut stats = CollectionLoadStats::new(RecordKind::Center, "Center.data.csv");
        stats.lines_read = 5;
        stats.records_loaded = 3;
        stats.skipped.push(SkippedLine {
            line_number: 4,
            reason: "bad".to_string(),
        });
        stats.duplicate_ids.push(7);
        stats.load_duration = Duration::from_millis(1500);

        let summary = stats.summary();
        assert!(summary.contains("center"));
        assert!(summary.contains("loaded 3 of 5 lines"));
        assert!(summary.contains("1 skipped"));
        assert!(summary.contains("1 duplicate IDs"));
        assert!(summary.contains("1.50s"));
        assert!(stats.has_warnings());

        stats.error = Some("permission denied".to_string());
        assert!(stats.summary().contains("not loaded (permission denied)"));
    }

    #[test]
    fn test_load_report_totals() {
        let mut report = LoadReport::new();
        let mut cities = CollectionLoadStats::new(RecordKind::City, "a");
        cities.records_loaded = 10;
        let mut weather = CollectionLoadStats::new(RecordKind::Weather, "b");
        weather.records_loaded = 4;
        weather.skipped.push(SkippedLine {
            line_number: 2,
            reason: "x".to_string(),
        });
        report.collections.push(cities);
        report.collections.push(weather);

        assert_eq!(report.total_records(), 14);
        assert_eq!(report.total_skipped(), 1);
        assert!(!report.has_errors());
        assert!(report.has_warnings());
        assert_eq!(report.for_kind(RecordKind::Weather).unwrap().records_loaded, 4);
        assert!(report.for_kind(RecordKind::Operator).is_none());
        assert!(report.summary().starts_with("Loaded 14 records from 2 files"));
    }
}
