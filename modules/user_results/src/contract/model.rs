use chrono::{DateTime, Utc};
use serde_json::Value;

/// Pure user model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub enabled: bool,
}

/// Validated data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub enabled: bool,
}

/// User fields as received from a client; `None` means "not sent".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub enabled: Option<bool>,
}

impl UserInput {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.enabled.is_none()
    }
}

/// A recorded result together with the user that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub id: i32,
    /// Opaque value supplied by the client.
    pub result: Value,
    pub user: User,
    pub time: DateTime<Utc>,
}

/// Result fields as received from a client; JSON `null` counts as "not sent".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultInput {
    pub result: Option<Value>,
    pub user_id: Option<Value>,
    pub time: Option<Value>,
}

/// Validated data for creating a result. The owner is still an unresolved reference.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResult {
    pub result: Value,
    pub user_ref: Value,
    pub time: DateTime<Utc>,
}

/// Validated partial update of a result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultUpdate {
    pub result: Option<Value>,
    pub user_ref: Option<Value>,
    pub time: Option<DateTime<Utc>>,
}
