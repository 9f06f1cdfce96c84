//! Business operations on top of the record store
//!
//! Every operation takes the store and the session explicitly. Operations that
//! act for an operator read the operator from the session and refresh the
//! session after changing the operator's record.

use crate::app::models::Operator;
use crate::app::services::session::Session;
use crate::{Error, Result};

pub mod accounts;
pub mod centers;
pub mod credentials;
pub mod summary;

#[cfg(test)]
pub mod tests;

pub use accounts::{Registration, associate_center, is_username_taken, log_in, register};
pub use centers::{add_observation, create_center, current_date_string, is_date_valid};
pub use credentials::{CredentialRules, hash_password, is_valid_password};
pub use summary::{CategorySummary, WeatherSummary};

/// The logged-in operator, or a session error
pub(crate) fn require_operator(session: &Session) -> Result<Operator> {
    session
        .current()
        .cloned()
        .ok_or_else(|| Error::session("no operator is logged in"))
}
