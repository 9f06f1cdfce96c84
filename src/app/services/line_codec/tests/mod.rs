//! Shared fixtures for line codec tests

use crate::app::models::{City, MonitoringCenter, Operator, ScoreCategory, WeatherRecord, WeatherScore};


pub fn sample_city() -> City {
    City::new(
        3173435,
        "Milano",
        "Milano",
        "IT",
        Some("Italy".to_string()),
        45.46427,
        9.18951,
    )
    .unwrap()
}

pub fn sample_operator(center_id: Option<u32>) -> Operator {
    Operator::new(
        4,
        "Mario Rossi",
        "RSSMRA80A01H501T",
        "mario.rossi@example.it",
        "mrossi",
        "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8",
        center_id,
    )
    .unwrap()
}

pub fn sample_center() -> MonitoringCenter {
    MonitoringCenter::new(
        2,
        "Centro Alpi",
        "Via Roma",
        "12",
        "23100",
        "Sondrio",
        "SO",
        vec![12, 47, 101],
    )
    .unwrap()
}

pub fn sample_weather() -> WeatherRecord {
    let record = WeatherRecord::new(9, 3173435, 2, "14/03/2024", Default::default()).unwrap();
    record
        .with_score(
            ScoreCategory::Wind,
            WeatherScore::new(Some(4), Some("looks windy".to_string())).unwrap(),
        )
        .with_score(ScoreCategory::Pressure, WeatherScore::new(Some(2), None).unwrap())
        .with_score(
            ScoreCategory::GlacierMass,
            WeatherScore::new(None, Some("no survey this week".to_string())).unwrap(),
        )
}
