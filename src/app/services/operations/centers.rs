//! Centre creation and observation entry for the logged-in operator

use super::require_operator;
use crate::app::models::{
    MonitoringCenter, NewCenter, NewWeatherRecord, RecordId, WeatherRecord, WeatherScore,
};
use crate::app::services::record_store::RecordStore;
use crate::app::services::session::Session;
use crate::constants::{OBSERVATION_DATE_FORMAT, SCORE_CATEGORY_COUNT};
use crate::{Error, Result};
use chrono::{Local, NaiveDate};
use tracing::info;

/// Create a centre and make the logged-in operator its member
pub fn create_center(
    store: &mut RecordStore,
    session: &mut Session,
    form: NewCenter,
) -> Result<MonitoringCenter> {
    let operator = require_operator(session)?;
    if let Some(current) = operator.center_id() {
        return Err(Error::session(format!(
            "operator '{}' already belongs to centre {}",
            operator.username(),
            current
        )));
    }

    let required = [
        ("centre name", &form.name),
        ("street", &form.street),
        ("street number", &form.street_number),
        ("postal code", &form.postal_code),
        ("town", &form.town),
        ("district", &form.district),
    ];
    for (label, value) in required {
        if value.trim().is_empty() {
            return Err(Error::data_validation(format!("{} must not be blank", label)));
        }
    }

    if form.city_ids.is_empty() {
        return Err(Error::data_validation("a centre needs at least one city"));
    }
    for city_id in &form.city_ids {
        if store.cities().get_by_id(*city_id)?.is_none() {
            return Err(Error::data_validation(format!(
                "city {} does not exist",
                city_id
            )));
        }
    }

    let center = store.insert_center(form)?;
    let updated = operator.with_center(center.id());
    store.update(updated.clone())?;
    session.set_current(Some(updated));

    info!(
        "Operator '{}' created centre {} '{}'",
        operator.username(),
        center.id(),
        center.name()
    );
    Ok(center)
}

/// Record an observation for a city on behalf of the operator's centre
pub fn add_observation(
    store: &mut RecordStore,
    session: &Session,
    city_id: RecordId,
    date: &str,
    scores: [WeatherScore; SCORE_CATEGORY_COUNT],
) -> Result<WeatherRecord> {
    let operator = require_operator(session)?;
    let center_id = operator.center_id().ok_or_else(|| {
        Error::session(format!(
            "operator '{}' does not belong to a centre",
            operator.username()
        ))
    })?;

    if store.cities().get_by_id(city_id)?.is_none() {
        return Err(Error::data_validation(format!(
            "city {} does not exist",
            city_id
        )));
    }
    if !is_date_valid(date, today()) {
        return Err(Error::data_validation(format!(
            "'{}' is not a dd/mm/yyyy date on or before today",
            date
        )));
    }
    if scores.iter().all(|score| score.score().is_none()) {
        return Err(Error::data_validation("at least one score is required"));
    }

    let record = store.insert_weather(NewWeatherRecord {
        city_id,
        center_id,
        date: date.to_string(),
        scores,
    })?;

    info!(
        "Centre {} recorded observation {} for city {}",
        center_id,
        record.id(),
        city_id
    );
    Ok(record)
}

/// A strict `dd/mm/yyyy` date that is not after `today`
pub fn is_date_valid(date: &str, today: NaiveDate) -> bool {
    // Both day and month are zero-padded
    if date.len() != 10 {
        return false;
    }
    NaiveDate::parse_from_str(date, OBSERVATION_DATE_FORMAT).is_ok_and(|parsed| parsed <= today)
}

/// Today's date formatted as an observation date
pub fn current_date_string() -> String {
    today().format(OBSERVATION_DATE_FORMAT).to_string()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
