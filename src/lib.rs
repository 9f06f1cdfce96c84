//! Climate Store Library
//!
//! A flat-file record store for a climate monitoring network: reference cities,
//! registered operators, monitoring centres and the weather observations they
//! submit. Every collection lives in memory as a map keyed by integer ID and is
//! mirrored to a delimited text file.
//!
//! This library provides tools for:
//! - Encoding and decoding records to and from single delimited lines
//! - Loading collections at startup while skipping malformed rows
//! - Querying collections with AND-of-conditions and OR-within-condition semantics
//! - Appending new records and rewriting single records in place
//! - Operator registration, login sessions and centre management on top of the store

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod file_store;
        pub mod line_codec;
        pub mod operations;
        pub mod record_store;
        pub mod session;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    City, MonitoringCenter, Operator, RecordId, RecordKind, ScoreCategory, WeatherRecord,
    WeatherScore,
};
pub use app::services::record_store::RecordStore;
pub use app::services::session::Session;
pub use config::StoreConfig;

/// Result type alias for the climate store
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store, query and business operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be decoded into a record
    #[error("Decode error for {kind} record: {message}")]
    Decode { kind: RecordKind, message: String },

    /// A field value cannot be written without corrupting the line
    #[error("Value for '{field}' cannot be stored: {reason}")]
    UnencodableValue { field: String, reason: String },

    /// Insert would create a second copy of an existing business entity
    #[error("{kind} record already exists: {message}")]
    DuplicateRecord { kind: RecordKind, message: String },

    /// No record carries the requested ID
    #[error("{kind} record not found: id = {id}")]
    RecordNotFound { kind: RecordKind, id: RecordId },

    /// Stored data breaks an invariant the store relies on
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Query refers to a field the entity does not have
    #[error("Unknown {kind} field: '{field}'")]
    UnknownField { kind: RecordKind, field: String },

    /// Query value does not fit the field it is compared against
    #[error("Invalid condition: {message}")]
    InvalidCondition { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Username and password do not identify exactly one operator
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Operation is not allowed in the current session state
    #[error("Session error: {message}")]
    Session { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a decode error
    pub fn decode(kind: RecordKind, message: impl Into<String>) -> Self {
        Self::Decode {
            kind,
            message: message.into(),
        }
    }

    /// Create an unencodable value error
    pub fn unencodable_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnencodableValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate record error
    pub fn duplicate_record(kind: RecordKind, message: impl Into<String>) -> Self {
        Self::DuplicateRecord {
            kind,
            message: message.into(),
        }
    }

    /// Create a record not found error
    pub fn record_not_found(kind: RecordKind, id: RecordId) -> Self {
        Self::RecordNotFound { kind, id }
    }

    /// Create an invariant violation error
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(kind: RecordKind, field: impl Into<String>) -> Self {
        Self::UnknownField {
            kind,
            field: field.into(),
        }
    }

    /// Create an invalid condition error
    pub fn invalid_condition(message: impl Into<String>) -> Self {
        Self::InvalidCondition {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a session state error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller rather than by stored data
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. } | Self::InvalidCondition { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
