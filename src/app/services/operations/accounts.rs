//! Operator registration, login and centre association

use super::credentials::{CredentialRules, hash_password, is_valid_password};
use super::require_operator;
use crate::app::models::{NewOperator, Operator, RecordId};
use crate::app::services::record_store::{Condition, OperatorField, RecordStore};
use crate::app::services::session::Session;
use crate::{Error, Result};
use tracing::info;

/// Registration form as entered by a new operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub full_name: String,
    pub tax_code: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Register a new operator without a centre
///
/// Any current operator is logged out first. Fields are checked in form order
/// and the first failure is returned.
pub fn register(
    store: &mut RecordStore,
    session: &mut Session,
    form: Registration,
) -> Result<Operator> {
    session.log_out();

    let rules = CredentialRules::new()?;
    if !rules.is_valid_full_name(&form.full_name) {
        return Err(Error::data_validation(
            "full name may only contain letters and spaces",
        ));
    }
    if !rules.is_valid_tax_code(&form.tax_code) {
        return Err(Error::data_validation(
            "tax code must look like RSSMRA80A01H501T",
        ));
    }
    if !rules.is_valid_email(&form.email) {
        return Err(Error::data_validation("email address is not valid"));
    }
    if !rules.is_valid_username(&form.username) || is_username_taken(store, &form.username)? {
        return Err(Error::data_validation(
            "username must be at least 3 of letters, digits, '.', '-', '_' and not already taken",
        ));
    }
    if !is_valid_password(&form.password) {
        return Err(Error::data_validation(
            "password must be at least 8 characters with an uppercase letter and a symbol",
        ));
    }

    let password_hash = hash_password(&form.username, &form.password);
    let operator = store.insert_operator(NewOperator {
        full_name: form.full_name,
        tax_code: form.tax_code,
        email: form.email,
        username: form.username,
        password_hash,
        center_id: None,
    })?;

    info!("Registered operator '{}'", operator.username());
    Ok(operator)
}

/// Check whether any operator already uses `username`
pub fn is_username_taken(store: &RecordStore, username: &str) -> Result<bool> {
    let matches = store
        .operators()
        .get_by(&[Condition::new(OperatorField::Username, username)])?;
    Ok(!matches.is_empty())
}

/// Log in with a username and plaintext password
///
/// The session is cleared first, so a failed attempt always leaves nobody
/// logged in.
pub fn log_in(
    store: &RecordStore,
    session: &mut Session,
    username: &str,
    password: &str,
) -> Result<Operator> {
    if username.is_empty() || password.is_empty() {
        return Err(Error::data_validation(
            "username and password must not be empty",
        ));
    }

    session.log_out();

    let password_hash = hash_password(username, password);
    let matches = store.operators().get_by(&[
        Condition::new(OperatorField::Username, username),
        Condition::new(OperatorField::PasswordHash, password_hash),
    ])?;

    match matches.as_slice() {
        [operator] => {
            let operator = (*operator).clone();
            session.set_current(Some(operator.clone()));
            info!("Operator '{}' logged in", username);
            Ok(operator)
        }
        _ => Err(Error::InvalidCredentials),
    }
}

/// Attach the logged-in operator to an existing centre
pub fn associate_center(
    store: &mut RecordStore,
    session: &mut Session,
    center_id: RecordId,
) -> Result<Operator> {
    let operator = require_operator(session)?;
    if let Some(current) = operator.center_id() {
        return Err(Error::session(format!(
            "operator '{}' already belongs to centre {}",
            operator.username(),
            current
        )));
    }
    if store.centers().get_by_id(center_id)?.is_none() {
        return Err(Error::data_validation(format!(
            "centre {} does not exist",
            center_id
        )));
    }

    let updated = operator.with_center(center_id);
    store.update(updated.clone())?;
    session.set_current(Some(updated.clone()));

    info!(
        "Operator '{}' joined centre {}",
        updated.username(),
        center_id
    );
    Ok(updated)
}
