//! Record store loading
//!
//! Data files are read once at startup. A line that fails to decode is logged
//! with its file and line number and skipped; a file that cannot be read at
//! all leaves its collection empty. Neither stops the other collections from
//! loading.

use super::metadata::{CollectionLoadStats, LoadReport, SkippedLine};
use super::query::Record;
use super::{Collection, RecordStore};
use crate::Result;
use crate::app::models::{City, MonitoringCenter, Operator, WeatherRecord};
use crate::app::services::file_store;
use crate::app::services::line_codec::{LineCodec, Separators};
use crate::config::StoreConfig;
use crate::constants::HEADER_LINES;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

impl RecordStore {
    /// Open the store described by `config`
    ///
    /// Missing data files are created with their header line first, then all
    /// four collections are loaded.
    ///
    /// # Errors
    /// * Returns `Error::Configuration` if the separators or null token are
    ///   unusable. Data problems never fail the open; they are in the report.
    pub fn open(config: StoreConfig) -> Result<(Self, LoadReport)> {
        config.validate()?;

        info!(
            "Opening record store in {}",
            config.data_dir.display()
        );

        let mut store = Self::new(config);
        let mut report = LoadReport::new();

        let (created, errors) = store.initialize_files();
        report.created_files = created;
        report.errors = errors;

        report.collections.push(store.reload::<City>());
        report.collections.push(store.reload::<Operator>());
        report.collections.push(store.reload::<MonitoringCenter>());
        report.collections.push(store.reload::<WeatherRecord>());

        info!("{}", report.summary());
        Ok((store, report))
    }

    /// Create every missing data file with its header line
    ///
    /// Returns the created files and the failures, one message per file.
    pub fn initialize_files(&self) -> (Vec<PathBuf>, Vec<String>) {
        let separator = self.separators.field;
        let targets: [(&Path, &[&str]); 4] = [
            (self.cities.path(), City::HEADERS),
            (self.operators.path(), Operator::HEADERS),
            (self.centers.path(), MonitoringCenter::HEADERS),
            (self.weather.path(), WeatherRecord::HEADERS),
        ];

        let mut created = Vec::new();
        let mut errors = Vec::new();
        for (path, headers) in targets {
            match file_store::initialize(path, headers, separator) {
                Ok(true) => created.push(path.to_path_buf()),
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to initialize {}: {}", path.display(), e);
                    errors.push(format!("{}: {}", path.display(), e));
                }
            }
        }
        (created, errors)
    }

    /// Replace one collection with the current contents of its file
    pub fn reload<T: super::Stored>(&mut self) -> CollectionLoadStats {
        let path = T::collection(self).path().to_path_buf();
        let (collection, stats) = Collection::<T>::load(&path, &self.separators);
        *T::collection_mut(self) = collection;
        stats
    }
}

impl<T: Record> Collection<T> {
    /// Load a collection from its file, skipping the header and bad lines
    pub fn load(path: &Path, separators: &Separators) -> (Self, CollectionLoadStats) {
        let start_time = Instant::now();
        let mut collection = Self::new(path);
        let mut stats = CollectionLoadStats::new(T::KIND, path);

        debug!("Loading {} records from {}", T::KIND, path.display());

        let lines = match file_store::read_lines(path) {
            Ok(lines) => lines,
            Err(e) => {
                error!("Failed to load {} records: {}", T::KIND, e);
                stats.error = Some(e.to_string());
                stats.load_duration = start_time.elapsed();
                return (collection, stats);
            }
        };

        for (index, line) in lines.iter().enumerate().skip(HEADER_LINES) {
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            stats.lines_read += 1;

            let record = match T::decode(line, separators) {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        "Skipping {} line {}: {}",
                        path.display(),
                        line_number,
                        e
                    );
                    stats.skipped.push(SkippedLine {
                        line_number,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match collection.records.entry(record.record_id()) {
                Entry::Vacant(entry) => {
                    entry.insert(record);
                    stats.records_loaded += 1;
                }
                Entry::Occupied(entry) => {
                    warn!(
                        "Duplicate {} ID {} at {} line {}, keeping first occurrence",
                        T::KIND,
                        entry.key(),
                        path.display(),
                        line_number
                    );
                    stats.duplicate_ids.push(*entry.key());
                }
            }
        }

        stats.load_duration = start_time.elapsed();
        info!(
            "Loaded {} {} records from {}",
            stats.records_loaded,
            T::KIND,
            path.display()
        );
        (collection, stats)
    }
}
