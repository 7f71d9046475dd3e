//! Payload validation and partial-update application.
//!
//! Everything here is synchronous and side-effect free apart from logging;
//! lookups that need the store (user references) live in the service.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::contract::model::{
    NewResult, NewUser, ResultInput, ResultRecord, ResultUpdate, User, UserInput,
};
use crate::domain::error::DomainError;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Accept a user creation payload: username and email must be non-empty.
pub fn validate_create_user(input: UserInput) -> Result<NewUser, DomainError> {
    let username = input.username.filter(|s| !s.is_empty());
    let email = input.email.filter(|s| !s.is_empty());

    match (username, email) {
        (Some(username), Some(email)) => Ok(NewUser {
            username,
            email,
            password: input.password.unwrap_or_default(),
            enabled: input.enabled.unwrap_or(false),
        }),
        _ => Err(DomainError::MissingCredentials),
    }
}

/// Accept a result creation payload: `result`, `user_id` and `time` must all be present.
/// Values are not inspected beyond presence; `time` falls back to now when unparseable.
pub fn validate_create_result(input: ResultInput) -> Result<NewResult, DomainError> {
    match (input.result, input.user_id, input.time) {
        (Some(result), Some(user_ref), Some(time)) => Ok(NewResult {
            result,
            user_ref,
            time: time_or_now(&time),
        }),
        _ => Err(DomainError::MissingResultFields),
    }
}

/// Accept a result update payload: at least one recognised field must be present.
pub fn validate_result_update(input: ResultInput) -> Result<ResultUpdate, DomainError> {
    if input.result.is_none() && input.user_id.is_none() && input.time.is_none() {
        return Err(DomainError::EmptyResultUpdate);
    }

    Ok(ResultUpdate {
        result: input.result,
        user_ref: input.user_id,
        time: input.time.as_ref().map(time_or_now),
    })
}

/// Overwrite every field present in `patch`; absent fields are left untouched.
pub fn apply_user_update(user: &mut User, patch: UserInput) {
    if let Some(username) = patch.username {
        user.username = username;
    }
    if let Some(email) = patch.email {
        user.email = email;
    }
    if let Some(password) = patch.password {
        user.password = password;
    }
    if let Some(enabled) = patch.enabled {
        user.enabled = enabled;
    }
}

/// Apply a validated result update. `owner` is the already-resolved user for `update.user_ref`.
pub fn apply_result_update(record: &mut ResultRecord, update: ResultUpdate, owner: Option<User>) {
    if let Some(owner) = owner {
        record.user = owner;
    }
    if let Some(result) = update.result {
        record.result = result;
    }
    if let Some(time) = update.time {
        record.time = time;
    }
}

/// Interpret a user reference: an integer, or a string holding one.
pub fn parse_user_ref(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a client-supplied timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.frac]`, `YYYY-MM-DDTHH:MM:SS[.frac]`,
/// a bare `YYYY-MM-DD`, or an integer number of seconds since the Unix epoch.
/// Naive values are taken as UTC.
pub fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    let raw = match value {
        Value::String(s) => s.trim(),
        Value::Number(n) => return n.as_i64().and_then(|s| DateTime::from_timestamp(s, 0)),
        _ => return None,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn time_or_now(value: &Value) -> DateTime<Utc> {
    parse_time(value).unwrap_or_else(|| {
        warn!(time = %value, "unparseable time, using current time");
        Utc::now()
    })
}
