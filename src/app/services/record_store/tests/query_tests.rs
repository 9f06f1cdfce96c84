//! Tests for condition-based queries

use super::*;
use crate::Error;
use crate::app::models::RecordId;
use crate::app::services::record_store::{
    CenterField, CityField, Condition, Coordinate, OperatorField, Record, Value, WeatherField,
};

fn ids<T: Record>(records: Vec<&T>) -> Vec<RecordId> {
    records.iter().map(|record| record.record_id()).collect()
}

#[test]
fn test_name_matches_in_any_case() {
    let (_temp_dir, store) = open_seeded_store();

    let milans = store
        .cities()
        .get_by(&[Condition::new(CityField::Name, "Milan")])
        .unwrap();

    assert_eq!(ids(milans), vec![4999001, 4999002, 4999003]);
}

#[test]
fn test_country_code_is_case_sensitive() {
    let (_temp_dir, store) = open_seeded_store();

    let lower = store
        .cities()
        .get_by_condition(&Condition::new(CityField::CountryCode, "it"))
        .unwrap();
    assert!(lower.is_empty());

    let upper = store
        .cities()
        .get_by_condition(&Condition::new(CityField::CountryCode, "IT"))
        .unwrap();
    assert_eq!(ids(upper), vec![3, 9, 3165524, 3173435]);
}

#[test]
fn test_operator_and_center_text_is_case_sensitive() {
    let (_temp_dir, store) = open_seeded_store();

    let lower = store
        .operators()
        .get_by(&[Condition::new(OperatorField::FullName, "mario rossi")])
        .unwrap();
    assert!(lower.is_empty());
    let exact = store
        .operators()
        .get_by(&[Condition::new(OperatorField::FullName, "Mario Rossi")])
        .unwrap();
    assert_eq!(ids(exact), vec![1]);

    for (field, wrong_case) in [
        (CenterField::Name, "CENTRO ALPI"),
        (CenterField::Street, "via roma"),
        (CenterField::Town, "sondrio"),
        (CenterField::District, "so"),
    ] {
        let centers = store
            .centers()
            .get_by(&[Condition::new(field, wrong_case)])
            .unwrap();
        assert!(centers.is_empty(), "{} matched '{}'", field, wrong_case);
    }

    let exact = store
        .centers()
        .get_by(&[
            Condition::new(CenterField::Name, "Centro Alpi"),
            Condition::new(CenterField::Town, "Sondrio"),
        ])
        .unwrap();
    assert_eq!(ids(exact), vec![1]);
}

#[test]
fn test_city_id_list_returns_union() {
    let (_temp_dir, store) = open_seeded_store();

    let centers = store
        .centers()
        .get_by(&[Condition::any_of(CenterField::CityId, [3u32, 9])])
        .unwrap();

    assert_eq!(ids(centers), vec![1, 2]);
}

#[test]
fn test_empty_value_list_matches_nothing() {
    let (_temp_dir, store) = open_seeded_store();

    let centers = store
        .centers()
        .get_by(&[Condition::any_of(CenterField::CityId, Vec::<RecordId>::new())])
        .unwrap();

    assert!(centers.is_empty());
}

#[test]
fn test_empty_query_returns_everything_in_id_order() {
    let (_temp_dir, store) = open_seeded_store();

    let all = store.cities().get_by(&[]).unwrap();

    let mut expected = store.cities().ids();
    expected.sort_unstable();
    assert_eq!(ids(all), expected);
    assert_eq!(expected.len(), CITY_ROWS.len());
}

#[test]
fn test_conditions_combine_with_and() {
    let (_temp_dir, store) = open_seeded_store();

    let records = store
        .weather()
        .get_by(&[
            Condition::new(WeatherField::Date, "15/03/2024"),
            Condition::new(WeatherField::CenterId, 1u32),
        ])
        .unwrap();

    assert_eq!(ids(records), vec![2]);
}

#[test]
fn test_latitude_tolerance_follows_written_decimals() {
    let (_temp_dir, store) = open_seeded_store();

    // 45.8 has one decimal: anything within 0.1 matches
    let coarse = store
        .cities()
        .get_by(&[Condition::new(CityField::Latitude, 45.8)])
        .unwrap();
    assert_eq!(ids(coarse), vec![4999001, 4999002]);

    // 45.80000 has five decimals: 45.80001 is a full unit away
    let fine = store
        .cities()
        .get_by(&[Condition::new(CityField::Latitude, "45.80000")])
        .unwrap();
    assert_eq!(ids(fine), vec![4999001]);

    let exact = store
        .cities()
        .get_by(&[Condition::new(CityField::Latitude, "45.80001")])
        .unwrap();
    assert_eq!(ids(exact), vec![4999002]);
}

#[test]
fn test_coordinate_decimals() {
    let coordinate: Coordinate = "45.80000".parse().unwrap();
    assert_eq!(coordinate.decimals(), 5);
    assert_eq!(coordinate.to_string(), "45.80000");

    let comma: Coordinate = "45,8".parse().unwrap();
    assert_eq!(comma.decimals(), 1);
    assert_eq!(comma.value(), 45.8);

    assert_eq!(Coordinate::from(45.8).decimals(), 1);
    assert_eq!(Coordinate::from(46.0).decimals(), 0);
    assert!(Coordinate::from(46.0).matches(46.9));
    assert!(!Coordinate::from(46.0).matches(47.0));

    assert!("north".parse::<Coordinate>().is_err());
}

#[test]
fn test_long_coordinate_text_still_matches_exact_value() {
    let (_temp_dir, store) = open_seeded_store();

    let text = format!("45.8{}", "0".repeat(400));
    let coordinate: Coordinate = text.parse().unwrap();
    assert_eq!(coordinate.decimals(), 401);
    assert!(coordinate.epsilon() > 0.0);
    assert!(coordinate.matches(45.8));
    assert!(!coordinate.matches(45.80001));

    let cities = store
        .cities()
        .get_by(&[Condition::new(CityField::Latitude, text.as_str())])
        .unwrap();
    assert_eq!(ids(cities), vec![4999001]);
}

#[test]
fn test_nullable_center_id_matches_null() {
    let (_temp_dir, store) = open_seeded_store();

    let unassigned = store
        .operators()
        .get_by(&[Condition::new(OperatorField::CenterId, Value::Null)])
        .unwrap();
    assert_eq!(ids(unassigned), vec![2]);

    let parsed = store
        .operators()
        .get_by(&[Condition::new(OperatorField::CenterId, "NULL")])
        .unwrap();
    assert_eq!(ids(parsed), vec![2]);

    let assigned = store
        .operators()
        .get_by(&[Condition::new(OperatorField::CenterId, 1u32)])
        .unwrap();
    assert_eq!(ids(assigned), vec![1]);
}

#[test]
fn test_username_and_hash_lookup() {
    let (_temp_dir, store) = open_seeded_store();

    let found = store
        .operators()
        .get_by(&[
            Condition::new(OperatorField::Username, "mrossi"),
            Condition::new(OperatorField::PasswordHash, HASH_MROSSI),
        ])
        .unwrap();
    assert_eq!(ids(found), vec![1]);

    let wrong_hash = store
        .operators()
        .get_by(&[
            Condition::new(OperatorField::Username, "mrossi"),
            Condition::new(OperatorField::PasswordHash, HASH_GBIANCHI),
        ])
        .unwrap();
    assert!(wrong_hash.is_empty());

    // Usernames are case-sensitive
    let upper = store
        .operators()
        .get_by(&[Condition::new(OperatorField::Username, "MROSSI")])
        .unwrap();
    assert!(upper.is_empty());
}

#[test]
fn test_wrong_value_type_is_usage_error() {
    let (_temp_dir, store) = open_seeded_store();

    let result = store
        .cities()
        .get_by(&[Condition::new(CityField::Latitude, "north")]);
    assert!(matches!(result, Err(Error::InvalidCondition { .. })));

    let result = store
        .centers()
        .get_by(&[Condition::new(CenterField::Name, 4u32)]);
    match result {
        Err(error) => assert!(error.is_usage_error()),
        Ok(_) => panic!("expected a usage error"),
    }

    // Only the operator's centre ID is nullable
    let result = store
        .weather()
        .get_by(&[Condition::new(WeatherField::CenterId, Value::Null)]);
    assert!(matches!(result, Err(Error::InvalidCondition { .. })));
}

#[test]
fn test_field_names_parse_exactly() {
    assert_eq!("ASCIIName".parse::<CityField>().unwrap(), CityField::AsciiName);
    assert_eq!("CAP".parse::<CenterField>().unwrap(), CenterField::PostalCode);
    assert_eq!(
        "nameSurname".parse::<OperatorField>().unwrap(),
        OperatorField::FullName
    );
    assert_eq!(CenterField::CityId.to_string(), "cityID");

    match "population".parse::<CityField>() {
        Err(Error::UnknownField { field, .. }) => assert_eq!(field, "population"),
        other => panic!("expected unknown field, got {:?}", other),
    }
    assert!("Name".parse::<CityField>().is_err());
}

#[test]
fn test_parse_condition_expression() {
    let (_temp_dir, store) = open_seeded_store();

    let condition: Condition<CenterField> = Condition::parse("cityID=3,9").unwrap();
    let centers = store.centers().get_by(&[condition]).unwrap();
    assert_eq!(ids(centers), vec![1, 2]);

    let condition: Condition<CityField> = Condition::parse("countryName=italy").unwrap();
    assert_eq!(store.cities().get_by(&[condition]).unwrap().len(), 2);

    assert!(Condition::<CityField>::parse("name").is_err());
    assert!(Condition::<CityField>::parse("size=3").is_err());
}

#[test]
fn test_get_by_id() {
    let (_temp_dir, store) = open_seeded_store();

    assert_eq!(store.centers().get_by_id(5).unwrap().unwrap().name(), "Centro Laghi");
    assert!(store.centers().get_by_id(4).unwrap().is_none());
}
