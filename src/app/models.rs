//! Data models for the climate store
//!
//! This module contains the record types held by the store: reference cities,
//! operators, monitoring centres and weather observations with their seven
//! scored categories. Records are immutable once built; changes produce a new
//! value through the `with_*` methods.

use crate::constants::{MAX_SCORE, MIN_SCORE, SCORE_CATEGORY_COUNT};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer primary key shared by every collection
pub type RecordId = u32;

/// The four record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    City,
    Operator,
    Center,
    Weather,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::City,
        RecordKind::Operator,
        RecordKind::Center,
        RecordKind::Weather,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::City => "city",
            RecordKind::Operator => "operator",
            RecordKind::Center => "center",
            RecordKind::Weather => "weather",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// City
// =============================================================================

/// Reference city loaded from the seed dataset
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct City {
    id: RecordId,
    name: String,
    ascii_name: String,
    country_code: String,
    /// Absent for rows written without the country name column
    country_name: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl City {
    /// Create a new City with validation
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        ascii_name: impl Into<String>,
        country_code: impl Into<String>,
        country_name: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self> {
        let city = Self {
            id,
            name: name.into(),
            ascii_name: ascii_name.into(),
            country_code: country_code.into(),
            country_name,
            latitude,
            longitude,
        };

        city.validate()?;
        Ok(city)
    }

    /// Validate coordinate ranges and required names
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::data_validation(format!(
                "Invalid latitude {}: must be between -90 and 90 degrees",
                self.latitude
            )));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::data_validation(format!(
                "Invalid longitude {}: must be between -180 and 180 degrees",
                self.longitude
            )));
        }

        if self.name.trim().is_empty() {
            return Err(Error::data_validation("City name cannot be empty"));
        }

        Ok(())
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ascii_name(&self) -> &str {
        &self.ascii_name
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn country_name(&self) -> Option<&str> {
        self.country_name.as_deref()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Get city location as (latitude, longitude) tuple
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

// =============================================================================
// Operator
// =============================================================================

/// Registered operator of a monitoring centre
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Operator {
    id: RecordId,
    full_name: String,
    tax_code: String,
    email: String,
    username: String,
    /// Hex SHA-256 digest, never the plaintext password
    #[serde(skip_serializing)]
    password_hash: String,
    center_id: Option<RecordId>,
}

impl Operator {
    /// Create a new Operator with validation
    pub fn new(
        id: RecordId,
        full_name: impl Into<String>,
        tax_code: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        center_id: Option<RecordId>,
    ) -> Result<Self> {
        let operator = Self {
            id,
            full_name: full_name.into(),
            tax_code: tax_code.into(),
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            center_id,
        };

        if operator.username.trim().is_empty() {
            return Err(Error::data_validation("Operator username cannot be empty"));
        }
        if operator.password_hash.is_empty() {
            return Err(Error::data_validation(
                "Operator password hash cannot be empty",
            ));
        }

        Ok(operator)
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn tax_code(&self) -> &str {
        &self.tax_code
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn center_id(&self) -> Option<RecordId> {
        self.center_id
    }

    /// Copy of this operator attached to a monitoring centre
    pub fn with_center(&self, center_id: RecordId) -> Self {
        Self {
            center_id: Some(center_id),
            ..self.clone()
        }
    }
}

// =============================================================================
// Monitoring Center
// =============================================================================

/// Monitoring centre and the cities it observes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitoringCenter {
    id: RecordId,
    name: String,
    street: String,
    street_number: String,
    postal_code: String,
    town: String,
    district: String,
    city_ids: Vec<RecordId>,
}

impl MonitoringCenter {
    /// Create a new MonitoringCenter; the city list must not be empty
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        street: impl Into<String>,
        street_number: impl Into<String>,
        postal_code: impl Into<String>,
        town: impl Into<String>,
        district: impl Into<String>,
        city_ids: Vec<RecordId>,
    ) -> Result<Self> {
        if city_ids.is_empty() {
            return Err(Error::data_validation(
                "Monitoring center must reference at least one city",
            ));
        }

        Ok(Self {
            id,
            name: name.into(),
            street: street.into(),
            street_number: street_number.into(),
            postal_code: postal_code.into(),
            town: town.into(),
            district: district.into(),
            city_ids,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn street_number(&self) -> &str {
        &self.street_number
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn town(&self) -> &str {
        &self.town
    }

    pub fn district(&self) -> &str {
        &self.district
    }

    pub fn city_ids(&self) -> &[RecordId] {
        &self.city_ids
    }

    /// Check whether the centre observes a city
    pub fn references_city(&self, city_id: RecordId) -> bool {
        self.city_ids.contains(&city_id)
    }
}

// =============================================================================
// Weather Scores
// =============================================================================

/// Fixed weather categories scored by every observation, in file column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreCategory {
    Wind,
    Humidity,
    Pressure,
    Temperature,
    Precipitation,
    GlacierElevation,
    GlacierMass,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; SCORE_CATEGORY_COUNT] = [
        ScoreCategory::Wind,
        ScoreCategory::Humidity,
        ScoreCategory::Pressure,
        ScoreCategory::Temperature,
        ScoreCategory::Precipitation,
        ScoreCategory::GlacierElevation,
        ScoreCategory::GlacierMass,
    ];

    /// Position of the category among the seven score columns
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Key used in queries and reports
    pub fn key(&self) -> &'static str {
        match self {
            ScoreCategory::Wind => "wind",
            ScoreCategory::Humidity => "humidity",
            ScoreCategory::Pressure => "pressure",
            ScoreCategory::Temperature => "temperature",
            ScoreCategory::Precipitation => "precipitation",
            ScoreCategory::GlacierElevation => "glacierElevation",
            ScoreCategory::GlacierMass => "glacierMass",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::Wind => "Wind",
            ScoreCategory::Humidity => "Humidity",
            ScoreCategory::Pressure => "Pressure",
            ScoreCategory::Temperature => "Temperature",
            ScoreCategory::Precipitation => "Precipitation",
            ScoreCategory::GlacierElevation => "Glacier elevation",
            ScoreCategory::GlacierMass => "Mass of glaciers",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ScoreCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ScoreCategory::ALL
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::data_validation(format!("Unknown score category: '{}'", s)))
    }
}

/// Score and comment for one category of an observation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeatherScore {
    score: Option<u8>,
    comment: Option<String>,
}

impl WeatherScore {
    /// Create a score; a present score must lie within 1..=5
    pub fn new(score: Option<u8>, comment: Option<String>) -> Result<Self> {
        if let Some(value) = score {
            if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                return Err(Error::data_validation(format!(
                    "Invalid score {}: must be between {} and {}",
                    value, MIN_SCORE, MAX_SCORE
                )));
            }
        }

        Ok(Self { score, comment })
    }

    /// Category left blank by the operator
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn score(&self) -> Option<u8> {
        self.score
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.comment.is_none()
    }
}

// =============================================================================
// Weather Record
// =============================================================================

/// Weather observation submitted by a centre for a city
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeatherRecord {
    id: RecordId,
    city_id: RecordId,
    center_id: RecordId,
    date: String,
    scores: [WeatherScore; SCORE_CATEGORY_COUNT],
}

impl WeatherRecord {
    /// Create a new WeatherRecord with scores in category order
    pub fn new(
        id: RecordId,
        city_id: RecordId,
        center_id: RecordId,
        date: impl Into<String>,
        scores: [WeatherScore; SCORE_CATEGORY_COUNT],
    ) -> Result<Self> {
        let date = date.into();
        if date.trim().is_empty() {
            return Err(Error::data_validation("Observation date cannot be empty"));
        }

        Ok(Self {
            id,
            city_id,
            center_id,
            date,
            scores,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn city_id(&self) -> RecordId {
        self.city_id
    }

    pub fn center_id(&self) -> RecordId {
        self.center_id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn scores(&self) -> &[WeatherScore; SCORE_CATEGORY_COUNT] {
        &self.scores
    }

    /// Score recorded for one category
    pub fn score(&self, category: ScoreCategory) -> &WeatherScore {
        &self.scores[category.index()]
    }

    /// Copy of this record with one category replaced
    pub fn with_score(&self, category: ScoreCategory, score: WeatherScore) -> Self {
        let mut updated = self.clone();
        updated.scores[category.index()] = score;
        updated
    }

    /// Iterate over (category, score) pairs in column order
    pub fn iter_scores(&self) -> impl Iterator<Item = (ScoreCategory, &WeatherScore)> {
        ScoreCategory::ALL.into_iter().zip(self.scores.iter())
    }
}

// =============================================================================
// Insert Payloads
// =============================================================================

/// Operator fields supplied by the caller; the store assigns the ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOperator {
    pub full_name: String,
    pub tax_code: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub center_id: Option<RecordId>,
}

impl NewOperator {
    pub fn into_record(self, id: RecordId) -> Result<Operator> {
        Operator::new(
            id,
            self.full_name,
            self.tax_code,
            self.email,
            self.username,
            self.password_hash,
            self.center_id,
        )
    }
}

/// Centre fields supplied by the caller; the store assigns the ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCenter {
    pub name: String,
    pub street: String,
    pub street_number: String,
    pub postal_code: String,
    pub town: String,
    pub district: String,
    pub city_ids: Vec<RecordId>,
}

impl NewCenter {
    pub fn into_record(self, id: RecordId) -> Result<MonitoringCenter> {
        MonitoringCenter::new(
            id,
            self.name,
            self.street,
            self.street_number,
            self.postal_code,
            self.town,
            self.district,
            self.city_ids,
        )
    }
}

/// Observation fields supplied by the caller; the store assigns the ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWeatherRecord {
    pub city_id: RecordId,
    pub center_id: RecordId,
    pub date: String,
    pub scores: [WeatherScore; SCORE_CATEGORY_COUNT],
}

impl NewWeatherRecord {
    pub fn into_record(self, id: RecordId) -> Result<WeatherRecord> {
        WeatherRecord::new(id, self.city_id, self.center_id, self.date, self.scores)
    }
}
