//! Record store service holding the four collections in memory
//!
//! This module provides the in-memory collections (ID to record maps) that are
//! loaded from the data files at startup and kept in step with them by the
//! write path. Queries only read the maps; the files are read again only when
//! a record is rewritten in place.

use crate::app::models::{City, MonitoringCenter, Operator, RecordId, RecordKind, WeatherRecord};
use crate::app::services::line_codec::Separators;
use crate::config::StoreConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod handler;
pub mod loader;
pub mod metadata;
pub mod query;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use metadata::{CollectionLoadStats, LoadReport, SkippedLine};
pub use query::{
    CenterField, CityField, Condition, ConditionValue, Coordinate, OperatorField, QueryField,
    Record, Value, ValueKind, WeatherField,
};

/// One collection of records, keyed by ID and backed by one file
#[derive(Debug, Clone)]
pub struct Collection<T> {
    /// Records indexed by ID
    pub(crate) records: HashMap<RecordId, T>,

    /// Backing data file
    pub(crate) path: PathBuf,
}

impl<T> Collection<T> {
    /// Create an empty collection backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            records: HashMap::new(),
            path: path.into(),
        }
    }

    /// Backing data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if a record exists under an ID
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// All IDs in ascending order
    pub fn ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over records in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }
}

/// Records that live in one of the store's collections
pub trait Stored: Record {
    fn collection(store: &RecordStore) -> &Collection<Self>;
    fn collection_mut(store: &mut RecordStore) -> &mut Collection<Self>;
}

impl Stored for City {
    fn collection(store: &RecordStore) -> &Collection<Self> {
        &store.cities
    }

    fn collection_mut(store: &mut RecordStore) -> &mut Collection<Self> {
        &mut store.cities
    }
}

impl Stored for Operator {
    fn collection(store: &RecordStore) -> &Collection<Self> {
        &store.operators
    }

    fn collection_mut(store: &mut RecordStore) -> &mut Collection<Self> {
        &mut store.operators
    }
}

impl Stored for MonitoringCenter {
    fn collection(store: &RecordStore) -> &Collection<Self> {
        &store.centers
    }

    fn collection_mut(store: &mut RecordStore) -> &mut Collection<Self> {
        &mut store.centers
    }
}

impl Stored for WeatherRecord {
    fn collection(store: &RecordStore) -> &Collection<Self> {
        &store.weather
    }

    fn collection_mut(store: &mut RecordStore) -> &mut Collection<Self> {
        &mut store.weather
    }
}

/// The four collections plus the codec settings used to persist them
///
/// All operations are synchronous. Writes take `&mut self`; the store assumes
/// it is the only writer of its data files.
#[derive(Debug, Clone)]
pub struct RecordStore {
    pub(crate) config: StoreConfig,
    pub(crate) separators: Separators,
    pub(crate) cities: Collection<City>,
    pub(crate) operators: Collection<Operator>,
    pub(crate) centers: Collection<MonitoringCenter>,
    pub(crate) weather: Collection<WeatherRecord>,
}

impl RecordStore {
    /// Create a store with empty collections; nothing is read or written
    pub fn new(config: StoreConfig) -> Self {
        Self {
            separators: config.separators(),
            cities: Collection::new(config.path_for(RecordKind::City)),
            operators: Collection::new(config.path_for(RecordKind::Operator)),
            centers: Collection::new(config.path_for(RecordKind::Center)),
            weather: Collection::new(config.path_for(RecordKind::Weather)),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn separators(&self) -> &Separators {
        &self.separators
    }

    pub fn cities(&self) -> &Collection<City> {
        &self.cities
    }

    pub fn operators(&self) -> &Collection<Operator> {
        &self.operators
    }

    pub fn centers(&self) -> &Collection<MonitoringCenter> {
        &self.centers
    }

    pub fn weather(&self) -> &Collection<WeatherRecord> {
        &self.weather
    }

    /// Collection holding records of type `T`
    pub fn collection<T: Stored>(&self) -> &Collection<T> {
        T::collection(self)
    }

    /// Number of records per collection
    pub fn counts(&self) -> [(RecordKind, usize); 4] {
        [
            (RecordKind::City, self.cities.len()),
            (RecordKind::Operator, self.operators.len()),
            (RecordKind::Center, self.centers.len()),
            (RecordKind::Weather, self.weather.len()),
        ]
    }
}
