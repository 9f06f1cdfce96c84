//! Application constants for the climate store
//!
//! This module contains file names, header rows, separators and the other
//! fixed values shared by the codec, the store and the CLI.

// =============================================================================
// File Format
// =============================================================================

/// Default primary field separator
pub const DEFAULT_FIELD_SEPARATOR: char = ';';

/// Default secondary separator for list and sub-record fields
pub const DEFAULT_SUB_SEPARATOR: char = '|';

/// Token written in place of a null scalar
pub const DEFAULT_NULL_TOKEN: &str = "NULL";

/// Number of header lines preceding the records in every data file
pub const HEADER_LINES: usize = 1;

// =============================================================================
// Data Files
// =============================================================================

/// Default directory holding the four data files
pub const DEFAULT_DATA_DIR: &str = "data";

pub const CITY_FILE_NAME: &str = "City.list.csv";
pub const OPERATOR_FILE_NAME: &str = "Operator.data.csv";
pub const CENTER_FILE_NAME: &str = "Center.data.csv";
pub const WEATHER_FILE_NAME: &str = "Weather.data.csv";

/// Header labels, informational only; columns are mapped by position
pub mod headers {
    pub const CITY: &[&str] = &[
        "City ID",
        "Name",
        "ASCII Name",
        "Country Code",
        "Country Name",
        "Latitude",
        "Longitude",
    ];

    pub const OPERATOR: &[&str] = &[
        "Operator ID",
        "Name Surname",
        "Tax code",
        "Email",
        "Username",
        "Password",
        "Center ID",
    ];

    pub const CENTER: &[&str] = &[
        "Center ID",
        "Center Name",
        "Street Name",
        "Street Number",
        "CAP",
        "Town Name",
        "District Name",
        "City IDs",
    ];

    pub const WEATHER: &[&str] = &[
        "Record ID",
        "City ID",
        "Center ID",
        "Date",
        "Wind",
        "Humidity",
        "Pressure",
        "Temperature",
        "Precipitation",
        "Glacier elevation",
        "Mass of glaciers",
    ];
}

// =============================================================================
// Record Layout
// =============================================================================

/// City rows with and without the optional country name column
pub const CITY_FIELDS_FULL: usize = 7;
pub const CITY_FIELDS_SHORT: usize = 6;

pub const OPERATOR_FIELDS: usize = 7;
pub const CENTER_FIELDS: usize = 8;

/// Leading scalar columns of a weather row before the seven scores
pub const WEATHER_LEADING_FIELDS: usize = 4;
pub const WEATHER_FIELDS: usize = WEATHER_LEADING_FIELDS + SCORE_CATEGORY_COUNT;

/// Number of fixed weather score categories
pub const SCORE_CATEGORY_COUNT: usize = 7;

/// Valid range for a weather score
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// First generated primary key for an empty collection
pub const FIRST_PRIMARY_KEY: u32 = 1;

// =============================================================================
// Business Rules
// =============================================================================

/// Observation date format (dd/MM/yyyy)
pub const OBSERVATION_DATE_FORMAT: &str = "%d/%m/%Y";

/// Characters accepted as the required password symbol
pub const PASSWORD_SYMBOLS: &str = "@#$%^&+=!.";

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Configuration
// =============================================================================

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV_VAR: &str = "CLIMATE_STORE_DATA_DIR";

/// Application directory name under the user's config directory
pub const APP_DIR_NAME: &str = "climate-store";

/// Config file name inside the application config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";
