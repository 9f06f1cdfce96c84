//! Shared test utilities and fixtures for record store tests

use crate::app::models::{NewCenter, NewOperator, NewWeatherRecord, RecordId, WeatherScore};
use crate::app::services::record_store::RecordStore;
use crate::config::StoreConfig;
use crate::constants::{
    CENTER_FILE_NAME, CITY_FILE_NAME, OPERATOR_FILE_NAME, WEATHER_FILE_NAME, headers,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub mod query_tests;

pub const HASH_MROSSI: &str = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
pub const HASH_GBIANCHI: &str = "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";

/// Seed cities: three spellings of Milan plus two rows without the country column
pub const CITY_ROWS: &[&str] = &[
    "3173435;Milano;Milano;IT;Italy;45.46427;9.18951",
    "3165524;Torino;Torino;IT;Italy;45.07049;7.68682",
    "4999001;Milan;Milan;US;United States;45.8;-88.0",
    "4999002;MILAN;Milan;US;United States;45.80001;-90.1",
    "4999003;milan;Milan;US;United States;42.07;-83.68",
    "2643743;London;London;GB;51.50853;-0.12574",
    "3;Trento;Trento;IT;46.06787;11.12108",
    "9;Bolzano;Bolzano;IT;46.49067;11.33982",
];

pub const OPERATOR_ROWS: &[&str] = &[
    "1;Mario Rossi;RSSMRA80A01H501T;mario.rossi@example.it;mrossi;5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8;1",
    "2;Giulia Bianchi;BNCGLI85M41F205X;giulia@example.it;gbianchi;a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3;NULL",
];

pub const CENTER_ROWS: &[&str] = &[
    "1;Centro Alpi;Via Roma;12;23100;Sondrio;SO;3|4",
    "2;Centro Adige;Corso Italia;5;39100;Bolzano;BZ;9",
    "5;Centro Laghi;Via Lago;1;22100;Como;CO;5|6",
];

pub const WEATHER_ROWS: &[&str] = &[
    "1;3;1;14/03/2024;4|looks windy;|NULL;2|NULL;|NULL;|NULL;|NULL;|NULL",
    "2;3;1;15/03/2024;3|NULL;4|humid;|NULL;|NULL;|NULL;|NULL;|NULL",
    "3;9;2;15/03/2024;|NULL;|NULL;|NULL;5|hot;|NULL;|NULL;|NULL",
];

/// Write a data file with the given header and rows
pub fn write_data_file(dir: &Path, file_name: &str, header: &[&str], rows: &[&str]) {
    let mut content = header.join(";");
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(dir.join(file_name), content).unwrap();
}

/// Write all four seed files into `dir`
pub fn seed_data_dir(dir: &Path) {
    write_data_file(dir, CITY_FILE_NAME, headers::CITY, CITY_ROWS);
    write_data_file(dir, OPERATOR_FILE_NAME, headers::OPERATOR, OPERATOR_ROWS);
    write_data_file(dir, CENTER_FILE_NAME, headers::CENTER, CENTER_ROWS);
    write_data_file(dir, WEATHER_FILE_NAME, headers::WEATHER, WEATHER_ROWS);
}

/// Open a store over freshly seeded files
///
/// The temporary directory must outlive the store.
pub fn open_seeded_store() -> (TempDir, RecordStore) {
    let temp_dir = TempDir::new().unwrap();
    seed_data_dir(temp_dir.path());
    let config = StoreConfig::default().with_data_dir(temp_dir.path());
    let (store, report) = RecordStore::open(config).unwrap();
    assert!(!report.has_errors());
    (temp_dir, store)
}

/// Number of lines currently in a data file, header included
pub fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

pub fn new_operator(username: &str, password_hash: &str) -> NewOperator {
    NewOperator {
        full_name: "Luca Verdi".to_string(),
        tax_code: "VRDLCU90C15L219K".to_string(),
        email: "luca.verdi@example.it".to_string(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        center_id: None,
    }
}

pub fn new_center(name: &str, city_ids: Vec<RecordId>) -> NewCenter {
    NewCenter {
        name: name.to_string(),
        street: "Via Roma".to_string(),
        street_number: "12".to_string(),
        postal_code: "23100".to_string(),
        town: "Sondrio".to_string(),
        district: "SO".to_string(),
        city_ids,
    }
}

pub fn new_observation(city_id: RecordId, center_id: RecordId, wind: u8) -> NewWeatherRecord {
    let mut scores: [WeatherScore; 7] = Default::default();
    scores[0] = WeatherScore::new(Some(wind), None).unwrap();
    NewWeatherRecord {
        city_id,
        center_id,
        date: "16/03/2024".to_string(),
        scores,
    }
}
