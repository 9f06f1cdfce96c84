//! Line layouts for the four record types

use super::{FieldReader, FieldWriter, LineCodec, Separators};
use crate::app::models::{
    City, MonitoringCenter, Operator, RecordKind, ScoreCategory, WeatherRecord, WeatherScore,
};
use crate::constants::{
    CENTER_FIELDS, CITY_FIELDS_FULL, CITY_FIELDS_SHORT, OPERATOR_FIELDS, SCORE_CATEGORY_COUNT,
    WEATHER_FIELDS, headers,
};
use crate::Result;

impl LineCodec for City {
    const KIND: RecordKind = RecordKind::City;
    const HEADERS: &'static [&'static str] = headers::CITY;

    /// Cities without a country name keep the short six-column layout
    fn encode(&self, separators: &Separators) -> Result<String> {
        let mut writer = FieldWriter::new(separators);
        writer
            .id(self.id())
            .text("name", self.name())?
            .text("ascii_name", self.ascii_name())?
            .text("country_code", self.country_code())?;
        if let Some(country_name) = self.country_name() {
            writer.optional_text("country_name", Some(country_name))?;
        }
        writer.coordinate(self.latitude()).coordinate(self.longitude());
        Ok(writer.finish())
    }

    fn decode(line: &str, separators: &Separators) -> Result<Self> {
        let mut reader = FieldReader::new(
            Self::KIND,
            line,
            separators,
            &[CITY_FIELDS_FULL, CITY_FIELDS_SHORT],
        )?;

        let id = reader.id("id")?;
        let name = reader.text("name")?;
        let ascii_name = reader.text("ascii_name")?;
        let country_code = reader.text("country_code")?;
        let country_name = if reader.field_count() == CITY_FIELDS_FULL {
            reader.optional_text("country_name")?
        } else {
            None
        };
        let latitude = reader.coordinate("latitude")?;
        let longitude = reader.coordinate("longitude")?;

        City::new(
            id,
            name,
            ascii_name,
            country_code,
            country_name,
            latitude,
            longitude,
        )
        .map_err(|e| reader.invalid(e))
    }
}

impl LineCodec for Operator {
    const KIND: RecordKind = RecordKind::Operator;
    const HEADERS: &'static [&'static str] = headers::OPERATOR;

    fn encode(&self, separators: &Separators) -> Result<String> {
        Ok(FieldWriter::new(separators)
            .id(self.id())
            .text("full_name", self.full_name())?
            .text("tax_code", self.tax_code())?
            .text("email", self.email())?
            .text("username", self.username())?
            .text("password_hash", self.password_hash())?
            .optional_id(self.center_id())
            .finish())
    }

    fn decode(line: &str, separators: &Separators) -> Result<Self> {
        let mut reader = FieldReader::new(Self::KIND, line, separators, &[OPERATOR_FIELDS])?;

        let id = reader.id("id")?;
        let full_name = reader.text("full_name")?;
        let tax_code = reader.text("tax_code")?;
        let email = reader.text("email")?;
        let username = reader.text("username")?;
        let password_hash = reader.text("password_hash")?;
        let center_id = reader.optional_id("center_id")?;

        Operator::new(
            id,
            full_name,
            tax_code,
            email,
            username,
            password_hash,
            center_id,
        )
        .map_err(|e| reader.invalid(e))
    }
}

impl LineCodec for MonitoringCenter {
    const KIND: RecordKind = RecordKind::Center;
    const HEADERS: &'static [&'static str] = headers::CENTER;

    fn encode(&self, separators: &Separators) -> Result<String> {
        Ok(FieldWriter::new(separators)
            .id(self.id())
            .text("name", self.name())?
            .text("street", self.street())?
            .text("street_number", self.street_number())?
            .text("postal_code", self.postal_code())?
            .text("town", self.town())?
            .text("district", self.district())?
            .ids(self.city_ids())
            .finish())
    }

    fn decode(line: &str, separators: &Separators) -> Result<Self> {
        let mut reader = FieldReader::new(Self::KIND, line, separators, &[CENTER_FIELDS])?;

        let id = reader.id("id")?;
        let name = reader.text("name")?;
        let street = reader.text("street")?;
        let street_number = reader.text("street_number")?;
        let postal_code = reader.text("postal_code")?;
        let town = reader.text("town")?;
        let district = reader.text("district")?;
        let city_ids = reader.ids("city_ids")?;

        MonitoringCenter::new(
            id,
            name,
            street,
            street_number,
            postal_code,
            town,
            district,
            city_ids,
        )
        .map_err(|e| reader.invalid(e))
    }
}

impl LineCodec for WeatherRecord {
    const KIND: RecordKind = RecordKind::Weather;
    const HEADERS: &'static [&'static str] = headers::WEATHER;

    fn encode(&self, separators: &Separators) -> Result<String> {
        let mut writer = FieldWriter::new(separators);
        writer
            .id(self.id())
            .id(self.city_id())
            .id(self.center_id())
            .text("date", self.date())?;
        for (category, score) in self.iter_scores() {
            writer.score(category.key(), score)?;
        }
        Ok(writer.finish())
    }

    fn decode(line: &str, separators: &Separators) -> Result<Self> {
        let mut reader = FieldReader::new(Self::KIND, line, separators, &[WEATHER_FIELDS])?;

        let id = reader.id("id")?;
        let city_id = reader.id("city_id")?;
        let center_id = reader.id("center_id")?;
        let date = reader.text("date")?;

        let mut scores: [WeatherScore; SCORE_CATEGORY_COUNT] = Default::default();
        for category in ScoreCategory::ALL {
            scores[category.index()] = reader.score(category.key())?;
        }

        WeatherRecord::new(id, city_id, center_id, date, scores).map_err(|e| reader.invalid(e))
    }
}
