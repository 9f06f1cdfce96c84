//! Record store write path
//!
//! Inserts append one encoded line and then extend the in-memory map; updates
//! rewrite the whole file with one line replaced and then replace the map
//! entry. In both cases the file is written before memory changes, so a failed
//! write leaves the collection as it was.

use super::query::{CenterField, Condition, OperatorField, Record};
use super::{Collection, RecordStore, Stored};
use crate::app::models::{
    MonitoringCenter, NewCenter, NewOperator, NewWeatherRecord, Operator, RecordId, RecordKind,
    WeatherRecord,
};
use crate::app::services::file_store;
use crate::app::services::line_codec::{LineCodec, leading_id};
use crate::constants::{FIRST_PRIMARY_KEY, HEADER_LINES};
use crate::{Error, Result};
use tracing::{debug, info};

impl<T: Record> Collection<T> {
    /// Next unused ID: the largest ID plus one, or 1 when empty
    pub fn generate_primary_key(&self) -> RecordId {
        self.records
            .keys()
            .max()
            .map_or(FIRST_PRIMARY_KEY, |max| max.saturating_add(1))
    }
}

impl RecordStore {
    /// Insert a new operator
    ///
    /// # Errors
    /// * Returns `Error::DuplicateRecord` if an operator with the same username
    ///   and password hash exists
    pub fn insert_operator(&mut self, operator: NewOperator) -> Result<Operator> {
        let id = self.operators.generate_primary_key();
        let record = operator.into_record(id)?;

        let duplicates = self.operators.get_by(&[
            Condition::new(OperatorField::Username, record.username()),
            Condition::new(OperatorField::PasswordHash, record.password_hash()),
        ])?;
        if !duplicates.is_empty() {
            return Err(Error::duplicate_record(
                RecordKind::Operator,
                format!("username '{}' is already registered", record.username()),
            ));
        }

        self.append(record)
    }

    /// Insert a new monitoring centre
    ///
    /// # Errors
    /// * Returns `Error::DuplicateRecord` if a centre with the same name and
    ///   address already covers one of the new centre's cities
    pub fn insert_center(&mut self, center: NewCenter) -> Result<MonitoringCenter> {
        let id = self.centers.generate_primary_key();
        let record = center.into_record(id)?;

        let duplicates = self.centers.get_by(&[
            Condition::new(CenterField::Name, record.name()),
            Condition::new(CenterField::Street, record.street()),
            Condition::new(CenterField::StreetNumber, record.street_number()),
            Condition::new(CenterField::PostalCode, record.postal_code()),
            Condition::new(CenterField::Town, record.town()),
            Condition::new(CenterField::District, record.district()),
            Condition::any_of(CenterField::CityId, record.city_ids().iter().copied()),
        ])?;
        if let Some(existing) = duplicates.first() {
            return Err(Error::duplicate_record(
                RecordKind::Center,
                format!(
                    "'{}' at {} {} already exists with ID {}",
                    record.name(),
                    record.street(),
                    record.street_number(),
                    existing.id()
                ),
            ));
        }

        self.append(record)
    }

    /// Insert a new weather record; observations are never deduplicated
    pub fn insert_weather(&mut self, observation: NewWeatherRecord) -> Result<WeatherRecord> {
        let id = self.weather.generate_primary_key();
        let record = observation.into_record(id)?;
        self.append(record)
    }

    /// Rewrite the stored line of an existing record
    ///
    /// The first line whose leading ID matches is replaced; every other line is
    /// written back unchanged.
    ///
    /// # Errors
    /// * Returns `Error::RecordNotFound` if no line carries the record's ID;
    ///   the file is not written in that case
    pub fn update<T: Stored>(&mut self, record: T) -> Result<()> {
        let id = record.record_id();
        let line = record.encode(&self.separators)?;
        let separators = self.separators.clone();
        let collection = T::collection_mut(self);

        let mut lines = file_store::read_lines(&collection.path)?;
        let position = lines
            .iter()
            .skip(HEADER_LINES)
            .position(|existing| leading_id(existing, &separators) == Some(id))
            .map(|offset| offset + HEADER_LINES)
            .ok_or_else(|| Error::record_not_found(T::KIND, id))?;

        debug!(
            "Replacing line {} of {}",
            position + 1,
            collection.path.display()
        );
        lines[position] = line;
        file_store::write_lines(&collection.path, &lines)?;

        collection.records.insert(id, record);
        info!("Updated {} record {}", T::KIND, id);
        Ok(())
    }

    /// Encode, append to the file, then add to the map
    fn append<T: Stored>(&mut self, record: T) -> Result<T> {
        let id = record.record_id();
        let line = record.encode(&self.separators)?;
        let collection = T::collection_mut(self);

        if collection.contains(id) {
            return Err(Error::invariant_violation(format!(
                "generated {} ID {} is already in use",
                T::KIND,
                id
            )));
        }

        file_store::append_line(&collection.path, &line)?;
        collection.records.insert(id, record.clone());
        info!("Inserted {} record {}", T::KIND, id);
        Ok(record)
    }
}
