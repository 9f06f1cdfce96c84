//! Shared fixtures for business operation tests

use crate::app::models::{NewCenter, ScoreCategory, WeatherScore};
use crate::app::services::operations::Registration;
use crate::app::services::record_store::RecordStore;
use crate::app::services::session::Session;
use crate::config::StoreConfig;
use crate::constants::{CITY_FILE_NAME, SCORE_CATEGORY_COUNT, headers};
use std::fs;
use tempfile::TempDir;


pub const PASSWORD: &str = "Password1!";

/// Store with three cities and no other records, plus an empty session
pub fn setup() -> (TempDir, RecordStore, Session) {
    let temp_dir = TempDir::new().unwrap();
    let content = format!(
        "{}\n{}\n{}\n{}\n",
        headers::CITY.join(";"),
        "3173435;Milano;Milano;IT;Italy;45.46427;9.18951",
        "3165524;Torino;Torino;IT;Italy;45.07049;7.68682",
        "3;Trento;Trento;IT;46.06787;11.12108",
    );
    fs::write(temp_dir.path().join(CITY_FILE_NAME), content).unwrap();

    let config = StoreConfig::default().with_data_dir(temp_dir.path());
    let (store, _) = RecordStore::open(config).unwrap();
    (temp_dir, store, Session::new())
}

pub fn registration(username: &str) -> Registration {
    Registration {
        full_name: "Mario Rossi".to_string(),
        tax_code: "RSSMRA80A01H501T".to_string(),
        email: "mario.rossi@example.it".to_string(),
        username: username.to_string(),
        password: PASSWORD.to_string(),
    }
}

pub fn center_form(city_ids: Vec<u32>) -> NewCenter {
    NewCenter {
        name: "Centro Lombardia".to_string(),
        street: "Via Roma".to_string(),
        street_number: "12".to_string(),
        postal_code: "20100".to_string(),
        town: "Milano".to_string(),
        district: "MI".to_string(),
        city_ids,
    }
}

/// Scores with only the given categories filled in
pub fn scores(values: &[(ScoreCategory, u8, Option<&str>)]) -> [WeatherScore; SCORE_CATEGORY_COUNT] {
    let mut scores: [WeatherScore; SCORE_CATEGORY_COUNT] = Default::default();
    for (category, score, comment) in values {
        scores[category.index()] =
            WeatherScore::new(Some(*score), comment.map(str::to_string)).unwrap();
    }
    scores
}
