//! Condition-based record queries
//!
//! A query is a list of conditions combined by AND. Each condition names one
//! field of the record type and one or more values; a condition with several
//! values matches when any of them does. Conditions are checked against the
//! field's type before any record is scanned, and results always come back in
//! ascending ID order.

use super::Collection;
use crate::app::models::{City, MonitoringCenter, Operator, RecordId, RecordKind, WeatherRecord};
use crate::app::services::line_codec::LineCodec;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Share of one epsilon treated as float noise at the match boundary
const EPSILON_BOUNDARY_SLACK: f64 = 1e-6;

/// Decimals beyond this are below f64 precision and do not narrow the tolerance
const MAX_TOLERANCE_DECIMALS: u32 = 17;

// =============================================================================
// Values
// =============================================================================

/// A coordinate query value that remembers how many decimals it was written with
///
/// The number of decimals sets the match tolerance: `45.8` matches anything
/// within 0.1, `45.80000` anything within 0.00001.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    value: f64,
    decimals: u32,
}

impl Coordinate {
    pub fn new(value: f64, decimals: u32) -> Self {
        Self { value, decimals }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Match tolerance, `10^-decimals`, never finer than `10^-17`
    pub fn epsilon(&self) -> f64 {
        10f64.powi(-(self.decimals.min(MAX_TOLERANCE_DECIMALS) as i32))
    }

    /// Check a stored coordinate against this value
    ///
    /// A difference of a full epsilon never matches.
    pub fn matches(&self, stored: f64) -> bool {
        let difference = (stored - self.value).abs();
        difference / self.epsilon() < 1.0 - EPSILON_BOUNDARY_SLACK
    }
}

impl From<f64> for Coordinate {
    /// Decimals are taken from the shortest text form of the float
    fn from(value: f64) -> Self {
        Self::new(value, decimal_places(&value.to_string()))
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim().replace(',', ".");
        let value: f64 = text
            .parse()
            .map_err(|_| Error::invalid_condition(format!("'{}' is not a coordinate", s)))?;
        if !value.is_finite() {
            return Err(Error::invalid_condition(format!(
                "'{}' is not a finite coordinate",
                s
            )));
        }

        // Exponent forms carry no written decimals of their own
        let decimals = if text.contains(['e', 'E']) {
            decimal_places(&value.to_string())
        } else {
            decimal_places(&text)
        };
        Ok(Self::new(value, decimals))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.decimals as usize, self.value)
    }
}

fn decimal_places(text: &str) -> u32 {
    text.split_once('.')
        .map_or(0, |(_, fraction)| fraction.chars().filter(char::is_ascii_digit).count() as u32)
}

/// A single query value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Id(RecordId),
    Text(String),
    Coordinate(Coordinate),
    Null,
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::Id(id)
    }
}

impl From<Option<RecordId>> for Value {
    fn from(id: Option<RecordId>) -> Self {
        id.map_or(Value::Null, Value::Id)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Coordinate(Coordinate::from(value))
    }
}

impl From<Coordinate> for Value {
    fn from(value: Coordinate) -> Self {
        Value::Coordinate(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Id(id) => write!(f, "{}", id),
            Value::Text(text) => write!(f, "'{}'", text),
            Value::Coordinate(coordinate) => write!(f, "{}", coordinate),
            Value::Null => write!(f, "NULL"),
        }
    }
}

/// The type of value a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Id,
    /// An ID that may also be null
    NullableId,
    Text,
    Coordinate,
}

impl ValueKind {
    /// Bring a value into the form this kind compares against
    ///
    /// Text is parsed for numeric kinds so that values read from the command
    /// line or typed as strings work the same as typed ones.
    fn normalize(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (ValueKind::Id | ValueKind::NullableId, Value::Id(_))
            | (ValueKind::NullableId, Value::Null)
            | (ValueKind::Text, Value::Text(_))
            | (ValueKind::Coordinate, Value::Coordinate(_)) => Some(value.clone()),
            (ValueKind::Id | ValueKind::NullableId, Value::Text(text)) => {
                if self == ValueKind::NullableId && text.trim().eq_ignore_ascii_case("null") {
                    Some(Value::Null)
                } else {
                    text.trim().parse().ok().map(Value::Id)
                }
            }
            (ValueKind::Coordinate, Value::Text(text)) => {
                text.parse::<Coordinate>().ok().map(Value::Coordinate)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Fields
// =============================================================================

/// The closed set of queryable fields of one record type
pub trait QueryField:
    Copy + fmt::Debug + fmt::Display + FromStr<Err = Error> + PartialEq + 'static
{
    /// Record type the fields belong to
    const KIND: RecordKind;

    /// The ID field
    const ID: Self;

    /// Every field, in column order
    const ALL: &'static [Self];

    /// Field name as used in queries
    fn name(&self) -> &'static str;

    fn value_kind(&self) -> ValueKind;

    /// Look a field up by its exact name
    fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name() == name)
            .ok_or_else(|| Error::unknown_field(Self::KIND, name))
    }
}

/// Queryable fields of a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CityField {
    Id,
    Name,
    AsciiName,
    CountryCode,
    CountryName,
    Latitude,
    Longitude,
}

impl QueryField for CityField {
    const KIND: RecordKind = RecordKind::City;
    const ID: Self = CityField::Id;
    const ALL: &'static [Self] = &[
        CityField::Id,
        CityField::Name,
        CityField::AsciiName,
        CityField::CountryCode,
        CityField::CountryName,
        CityField::Latitude,
        CityField::Longitude,
    ];

    fn name(&self) -> &'static str {
        match self {
            CityField::Id => "ID",
            CityField::Name => "name",
            CityField::AsciiName => "ASCIIName",
            CityField::CountryCode => "countryCode",
            CityField::CountryName => "countryName",
            CityField::Latitude => "latitude",
            CityField::Longitude => "longitude",
        }
    }

    fn value_kind(&self) -> ValueKind {
        match self {
            CityField::Id => ValueKind::Id,
            CityField::Latitude | CityField::Longitude => ValueKind::Coordinate,
            _ => ValueKind::Text,
        }
    }
}

/// Queryable fields of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorField {
    Id,
    FullName,
    TaxCode,
    Email,
    Username,
    PasswordHash,
    CenterId,
}

impl QueryField for OperatorField {
    const KIND: RecordKind = RecordKind::Operator;
    const ID: Self = OperatorField::Id;
    const ALL: &'static [Self] = &[
        OperatorField::Id,
        OperatorField::FullName,
        OperatorField::TaxCode,
        OperatorField::Email,
        OperatorField::Username,
        OperatorField::PasswordHash,
        OperatorField::CenterId,
    ];

    fn name(&self) -> &'static str {
        match self {
            OperatorField::Id => "ID",
            OperatorField::FullName => "nameSurname",
            OperatorField::TaxCode => "taxCode",
            OperatorField::Email => "email",
            OperatorField::Username => "username",
            OperatorField::PasswordHash => "password",
            OperatorField::CenterId => "centerID",
        }
    }

    fn value_kind(&self) -> ValueKind {
        match self {
            OperatorField::Id => ValueKind::Id,
            OperatorField::CenterId => ValueKind::NullableId,
            _ => ValueKind::Text,
        }
    }
}

/// Queryable fields of a monitoring centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CenterField {
    Id,
    Name,
    Street,
    StreetNumber,
    PostalCode,
    Town,
    District,
    /// Matches when the value is one of the centre's cities
    CityId,
}

impl QueryField for CenterField {
    const KIND: RecordKind = RecordKind::Center;
    const ID: Self = CenterField::Id;
    const ALL: &'static [Self] = &[
        CenterField::Id,
        CenterField::Name,
        CenterField::Street,
        CenterField::StreetNumber,
        CenterField::PostalCode,
        CenterField::Town,
        CenterField::District,
        CenterField::CityId,
    ];

    fn name(&self) -> &'static str {
        match self {
            CenterField::Id => "ID",
            CenterField::Name => "centerName",
            CenterField::Street => "streetName",
            CenterField::StreetNumber => "streetNumber",
            CenterField::PostalCode => "CAP",
            CenterField::Town => "townName",
            CenterField::District => "districtName",
            CenterField::CityId => "cityID",
        }
    }

    fn value_kind(&self) -> ValueKind {
        match self {
            CenterField::Id | CenterField::CityId => ValueKind::Id,
            _ => ValueKind::Text,
        }
    }
}

/// Queryable fields of a weather record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherField {
    Id,
    CityId,
    CenterId,
    Date,
}

impl QueryField for WeatherField {
    const KIND: RecordKind = RecordKind::Weather;
    const ID: Self = WeatherField::Id;
    const ALL: &'static [Self] = &[
        WeatherField::Id,
        WeatherField::CityId,
        WeatherField::CenterId,
        WeatherField::Date,
    ];

    fn name(&self) -> &'static str {
        match self {
            WeatherField::Id => "ID",
            WeatherField::CityId => "cityID",
            WeatherField::CenterId => "centerID",
            WeatherField::Date => "date",
        }
    }

    fn value_kind(&self) -> ValueKind {
        match self {
            WeatherField::Date => ValueKind::Text,
            _ => ValueKind::Id,
        }
    }
}

impl FromStr for CityField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl FromStr for OperatorField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl FromStr for CenterField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl FromStr for WeatherField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for CityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for OperatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for CenterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for WeatherField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Conditions
// =============================================================================

/// One value or a list of alternatives
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Single(Value),
    AnyOf(Vec<Value>),
}

impl ConditionValue {
    fn alternatives(&self) -> &[Value] {
        match self {
            ConditionValue::Single(value) => std::slice::from_ref(value),
            ConditionValue::AnyOf(values) => values,
        }
    }
}

/// A field test applied to every record of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<F> {
    field: F,
    value: ConditionValue,
}

impl<F: QueryField> Condition<F> {
    /// Field equals `value`
    pub fn new(field: F, value: impl Into<Value>) -> Self {
        Self {
            field,
            value: ConditionValue::Single(value.into()),
        }
    }

    /// Field equals any of `values`; an empty list matches nothing
    pub fn any_of<V: Into<Value>>(field: F, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            field,
            value: ConditionValue::AnyOf(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Parse `FIELD=VALUE[,VALUE...]`
    ///
    /// Values are read as text and converted to the field's type when the
    /// query runs.
    pub fn parse(expression: &str) -> Result<Self> {
        let (field, values) = expression.split_once('=').ok_or_else(|| {
            Error::invalid_condition(format!(
                "'{}' is not of the form FIELD=VALUE",
                expression
            ))
        })?;
        let field: F = field.trim().parse()?;
        let values: Vec<&str> = values.split(',').collect();
        Ok(match values.as_slice() {
            [single] => Self::new(field, *single),
            _ => Self::any_of(field, values),
        })
    }

    pub fn field(&self) -> F {
        self.field
    }

    pub fn value(&self) -> &ConditionValue {
        &self.value
    }

    /// Convert every alternative to the field's type, failing on the first mismatch
    fn prepare(&self) -> Result<PreparedCondition<F>> {
        let kind = self.field.value_kind();
        let values = self
            .value
            .alternatives()
            .iter()
            .map(|value| {
                kind.normalize(value).ok_or_else(|| {
                    Error::invalid_condition(format!(
                        "{} field '{}' does not accept {}",
                        F::KIND,
                        self.field,
                        value
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PreparedCondition {
            field: self.field,
            values,
        })
    }
}

impl<F: QueryField> fmt::Display for Condition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ConditionValue::Single(value) => write!(f, "{} = {}", self.field, value),
            ConditionValue::AnyOf(values) => {
                let values: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "{} in [{}]", self.field, values.join(", "))
            }
        }
    }
}

struct PreparedCondition<F> {
    field: F,
    values: Vec<Value>,
}

impl<F: QueryField> PreparedCondition<F> {
    fn matches<T: Record<Field = F>>(&self, record: &T) -> bool {
        self.values
            .iter()
            .any(|value| record.field_matches(self.field, value))
    }
}

// =============================================================================
// Records
// =============================================================================

/// A record type that can be stored and queried
pub trait Record: LineCodec + Clone {
    type Field: QueryField;

    fn record_id(&self) -> RecordId;

    /// Compare one field against a value already converted to the field's type
    fn field_matches(&self, field: Self::Field, value: &Value) -> bool;
}

fn id_equals(stored: RecordId, value: &Value) -> bool {
    matches!(value, Value::Id(id) if *id == stored)
}

fn text_equals(stored: &str, value: &Value) -> bool {
    matches!(value, Value::Text(text) if text == stored)
}

fn text_equals_ignore_case(stored: &str, value: &Value) -> bool {
    matches!(value, Value::Text(text) if text.to_lowercase() == stored.to_lowercase())
}

fn coordinate_matches(stored: f64, value: &Value) -> bool {
    matches!(value, Value::Coordinate(coordinate) if coordinate.matches(stored))
}

impl Record for City {
    type Field = CityField;

    fn record_id(&self) -> RecordId {
        self.id()
    }

    fn field_matches(&self, field: CityField, value: &Value) -> bool {
        match field {
            CityField::Id => id_equals(self.id(), value),
            CityField::Name => text_equals_ignore_case(self.name(), value),
            CityField::AsciiName => text_equals_ignore_case(self.ascii_name(), value),
            CityField::CountryCode => text_equals(self.country_code(), value),
            CityField::CountryName => self
                .country_name()
                .is_some_and(|name| text_equals_ignore_case(name, value)),
            CityField::Latitude => coordinate_matches(self.latitude(), value),
            CityField::Longitude => coordinate_matches(self.longitude(), value),
        }
    }
}

impl Record for Operator {
    type Field = OperatorField;

    fn record_id(&self) -> RecordId {
        self.id()
    }

    fn field_matches(&self, field: OperatorField, value: &Value) -> bool {
        match field {
            OperatorField::Id => id_equals(self.id(), value),
            OperatorField::FullName => text_equals(self.full_name(), value),
            OperatorField::TaxCode => text_equals(self.tax_code(), value),
            OperatorField::Email => text_equals(self.email(), value),
            OperatorField::Username => text_equals(self.username(), value),
            OperatorField::PasswordHash => text_equals(self.password_hash(), value),
            OperatorField::CenterId => match (self.center_id(), value) {
                (None, Value::Null) => true,
                (Some(center_id), value) => id_equals(center_id, value),
                _ => false,
            },
        }
    }
}

impl Record for MonitoringCenter {
    type Field = CenterField;

    fn record_id(&self) -> RecordId {
        self.id()
    }

    fn field_matches(&self, field: CenterField, value: &Value) -> bool {
        match field {
            CenterField::Id => id_equals(self.id(), value),
            CenterField::Name => text_equals(self.name(), value),
            CenterField::Street => text_equals(self.street(), value),
            CenterField::StreetNumber => text_equals(self.street_number(), value),
            CenterField::PostalCode => text_equals(self.postal_code(), value),
            CenterField::Town => text_equals(self.town(), value),
            CenterField::District => text_equals(self.district(), value),
            CenterField::CityId => match value {
                Value::Id(city_id) => self.references_city(*city_id),
                _ => false,
            },
        }
    }
}

impl Record for WeatherRecord {
    type Field = WeatherField;

    fn record_id(&self) -> RecordId {
        self.id()
    }

    fn field_matches(&self, field: WeatherField, value: &Value) -> bool {
        match field {
            WeatherField::Id => id_equals(self.id(), value),
            WeatherField::CityId => id_equals(self.city_id(), value),
            WeatherField::CenterId => id_equals(self.center_id(), value),
            WeatherField::Date => text_equals(self.date(), value),
        }
    }
}

// =============================================================================
// Collection queries
// =============================================================================

impl<T: Record> Collection<T> {
    /// Records matching every condition, in ascending ID order
    ///
    /// # Errors
    /// * Returns `Error::InvalidCondition` if a value does not fit its field;
    ///   nothing is scanned in that case
    pub fn get_by(&self, conditions: &[Condition<T::Field>]) -> Result<Vec<&T>> {
        let prepared = conditions
            .iter()
            .map(Condition::prepare)
            .collect::<Result<Vec<_>>>()?;

        let mut matches: Vec<&T> = self
            .records
            .values()
            .filter(|record| prepared.iter().all(|condition| condition.matches(*record)))
            .collect();
        matches.sort_by_key(|record| record.record_id());

        debug!(
            "Query on {} with {} conditions matched {} of {} records",
            T::KIND,
            conditions.len(),
            matches.len(),
            self.records.len()
        );
        Ok(matches)
    }

    /// Records matching a single condition
    pub fn get_by_condition(&self, condition: &Condition<T::Field>) -> Result<Vec<&T>> {
        self.get_by(std::slice::from_ref(condition))
    }

    /// The record with `id`, if any
    ///
    /// # Errors
    /// * Returns `Error::InvariantViolation` if more than one record carries the ID
    pub fn get_by_id(&self, id: RecordId) -> Result<Option<&T>> {
        let matches = self.get_by_condition(&Condition::new(<T::Field as QueryField>::ID, id))?;
        match matches.as_slice() {
            [] => Ok(None),
            [record] => Ok(Some(*record)),
            _ => Err(Error::invariant_violation(format!(
                "{} {} records share ID {}",
                matches.len(),
                T::KIND,
                id
            ))),
        }
    }

    /// All records in ascending ID order
    pub fn all(&self) -> Vec<&T> {
        let mut records: Vec<&T> = self.records.values().collect();
        records.sort_by_key(|record| record.record_id());
        records
    }
}
