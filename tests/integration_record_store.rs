//! Integration tests for the record store and the operations built on it
//!
//! These tests start from an empty data directory, drive the public API the
//! way the interactive client does and reopen the store from disk to check
//! that every change survived.

use climate_store::app::models::{NewCenter, ScoreCategory, WeatherScore};
use climate_store::app::services::operations::{
    Registration, WeatherSummary, add_observation, associate_center, create_center, log_in,
    register,
};
use climate_store::app::services::record_store::{CityField, Condition, OperatorField, WeatherField};
use climate_store::constants::CITY_FILE_NAME;
use climate_store::{City, Error, RecordKind, RecordStore, Session, StoreConfig};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const PASSWORD: &str = "Montagna9!";

fn append_cities(dir: &Path, rows: &[&str]) {
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(dir.join(CITY_FILE_NAME))
        .unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
}

fn registration(username: &str, full_name: &str) -> Registration {
    Registration {
        full_name: full_name.to_string(),
        tax_code: "RSSMRA80A01H501T".to_string(),
        email: format!("{}@example.it", username),
        username: username.to_string(),
        password: PASSWORD.to_string(),
    }
}

fn scores(values: &[(ScoreCategory, u8, Option<&str>)]) -> [WeatherScore; 7] {
    let mut scores: [WeatherScore; 7] = Default::default();
    for (category, score, comment) in values {
        scores[category.index()] =
            WeatherScore::new(Some(*score), comment.map(str::to_string)).unwrap();
    }
    scores
}

/// Test the full lifecycle from an empty directory to a reopened store
///
/// Purpose: Validate that files created on first open accept appended cities,
/// operator registration, centre creation and observations, and that a fresh
/// store built from the same directory sees exactly the same records.
#[test]
fn test_store_lifecycle_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::default().with_data_dir(temp_dir.path());

    // First open creates every file with its header only
    let (_, report) = RecordStore::open(config.clone()).unwrap();
    assert_eq!(report.created_files.len(), 4);
    assert_eq!(report.total_records(), 0);
    assert!(!report.has_errors());

    append_cities(
        temp_dir.path(),
        &[
            "3173435;Milano;Milano;IT;Italy;45.46427;9.18951",
            "3165524;Torino;Torino;IT;Italy;45.07049;7.68682",
        ],
    );

    let (mut store, report) = RecordStore::open(config.clone()).unwrap();
    assert!(report.created_files.is_empty());
    assert_eq!(store.cities().len(), 2);

    let mut session = Session::new();
    register(&mut store, &mut session, registration("founder", "Anna Neri")).unwrap();
    register(&mut store, &mut session, registration("member", "Paolo Gialli")).unwrap();

    log_in(&store, &mut session, "founder", PASSWORD).unwrap();
    let center = create_center(
        &mut store,
        &mut session,
        NewCenter {
            name: "Centro Nord".to_string(),
            street: "Via Dante".to_string(),
            street_number: "7".to_string(),
            postal_code: "20121".to_string(),
            town: "Milano".to_string(),
            district: "MI".to_string(),
            city_ids: vec![3173435, 3165524],
        },
    )
    .unwrap();

    add_observation(
        &mut store,
        &session,
        3173435,
        "14/03/2024",
        scores(&[(ScoreCategory::Wind, 4, Some("gusty")), (ScoreCategory::Precipitation, 1, None)]),
    )
    .unwrap();
    add_observation(
        &mut store,
        &session,
        3173435,
        "15/03/2024",
        scores(&[(ScoreCategory::Wind, 3, None)]),
    )
    .unwrap();

    log_in(&store, &mut session, "member", PASSWORD).unwrap();
    associate_center(&mut store, &mut session, center.id()).unwrap();
    add_observation(
        &mut store,
        &session,
        3165524,
        "15/03/2024",
        scores(&[(ScoreCategory::Humidity, 5, Some("fog"))]),
    )
    .unwrap();

    // Reopen from disk
    let (reopened, report) = RecordStore::open(config).unwrap();
    assert!(!report.has_warnings());
    assert_eq!(
        reopened.counts(),
        [
            (RecordKind::City, 2),
            (RecordKind::Operator, 2),
            (RecordKind::Center, 1),
            (RecordKind::Weather, 3),
        ]
    );

    let members = reopened
        .operators()
        .get_by(&[Condition::new(OperatorField::CenterId, center.id())])
        .unwrap();
    let usernames: Vec<&str> = members.iter().map(|operator| operator.username()).collect();
    assert_eq!(usernames, vec!["founder", "member"]);

    let milan_weather = reopened
        .weather()
        .get_by(&[Condition::new(WeatherField::CityId, 3173435)])
        .unwrap();
    assert_eq!(milan_weather.len(), 2);

    let summary = WeatherSummary::from_records(milan_weather);
    let wind = summary.category(ScoreCategory::Wind);
    assert_eq!(wind.count, 2);
    assert_eq!(wind.average, Some(4));
    assert_eq!(wind.comments, vec!["gusty".to_string()]);
    assert_eq!(summary.scored_categories(), 2);
}

/// Test that queries coming from text behave like the typed API
#[test]
fn test_text_conditions_match_typed_conditions() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::default().with_data_dir(temp_dir.path());
    RecordStore::open(config.clone()).unwrap();
    append_cities(
        temp_dir.path(),
        &[
            "4999001;Milan;Milan;US;United States;45.8;-88.0",
            "4999003;milan;Milan;US;United States;42.07;-83.68",
            "3173435;Milano;Milano;IT;Italy;45.46427;9.18951",
        ],
    );
    let (store, _) = RecordStore::open(config).unwrap();

    let parsed: Vec<Condition<CityField>> = vec![
        Condition::parse("name=MILAN").unwrap(),
        Condition::parse("latitude=45.8,42.07").unwrap(),
    ];
    let typed = vec![
        Condition::new(CityField::Name, "milan"),
        Condition::any_of(CityField::Latitude, [45.8, 42.07]),
    ];

    let from_text: Vec<&City> = store.cities().get_by(&parsed).unwrap();
    let from_types: Vec<&City> = store.cities().get_by(&typed).unwrap();
    assert_eq!(from_text, from_types);
    assert_eq!(
        from_text.iter().map(|city| city.id()).collect::<Vec<_>>(),
        vec![4999001, 4999003]
    );

    let error = Condition::<CityField>::parse("population=5").unwrap_err();
    assert!(matches!(error, Error::UnknownField { .. }));
    assert!(error.is_usage_error());
}

/// Test that a corrupted line is skipped while the rest of the file loads
#[test]
fn test_corrupted_line_is_reported_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::default().with_data_dir(temp_dir.path());
    RecordStore::open(config.clone()).unwrap();
    append_cities(
        temp_dir.path(),
        &[
            "3173435;Milano;Milano;IT;Italy;45.46427;9.18951",
            "not-a-number;Broken;Broken;IT;Italy;0;0",
            "3165524;Torino;Torino;IT;Italy;45.07049;7.68682",
        ],
    );

    let (store, report) = RecordStore::open(config).unwrap();

    assert_eq!(store.cities().ids(), vec![3165524, 3173435]);
    let stats = report.for_kind(RecordKind::City).unwrap();
    assert_eq!(stats.records_loaded, 2);
    assert_eq!(stats.skipped.len(), 1);
    assert_eq!(stats.skipped[0].line_number, 3);
    assert!(report.has_warnings());
    assert!(!report.has_errors());
}
