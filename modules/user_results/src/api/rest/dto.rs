use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::model::{ResultInput, ResultRecord, User, UserInput};

/// REST DTO for user representation. The password is never rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub enabled: bool,
}

/// REST DTO for a result; the owning user is embedded under `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDto {
    pub id: i32,
    pub result: Value,
    #[serde(rename = "user_id")]
    pub user: UserDto,
    pub time: DateTime<Utc>,
}

/// REST DTO for creating a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserReq {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "enable")]
    pub enabled: Option<bool>,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserReq {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "enable")]
    pub enabled: Option<bool>,
}

/// REST DTO for creating a result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateResultReq {
    pub result: Option<Value>,
    pub user_id: Option<Value>,
    pub time: Option<Value>,
}

/// REST DTO for updating a result (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateResultReq {
    pub result: Option<Value>,
    pub user_id: Option<Value>,
    pub time: Option<Value>,
}

// --- envelopes ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserDto,
}

/// Lookup by username answers `{"user": null}` when nobody matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaybeUserEnvelope {
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListEnvelope {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub result: ResultDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultListEnvelope {
    pub results: Vec<ResultDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResultsEnvelope {
    pub user_results: Vec<ResultDto>,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            enabled: user.enabled,
        }
    }
}

impl From<ResultRecord> for ResultDto {
    fn from(record: ResultRecord) -> Self {
        Self {
            id: record.id,
            result: record.result,
            user: record.user.into(),
            time: record.time,
        }
    }
}

impl From<CreateUserReq> for UserInput {
    fn from(req: CreateUserReq) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            enabled: req.enabled,
        }
    }
}

impl From<UpdateUserReq> for UserInput {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            enabled: req.enabled,
        }
    }
}

impl From<CreateResultReq> for ResultInput {
    fn from(req: CreateResultReq) -> Self {
        Self {
            result: req.result,
            user_id: req.user_id,
            time: req.time,
        }
    }
}

impl From<UpdateResultReq> for ResultInput {
    fn from(req: UpdateResultReq) -> Self {
        Self {
            result: req.result,
            user_id: req.user_id,
            time: req.time,
        }
    }
}

impl From<Vec<User>> for UserListEnvelope {
    fn from(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(UserDto::from).collect(),
        }
    }
}

impl From<Vec<ResultRecord>> for ResultListEnvelope {
    fn from(results: Vec<ResultRecord>) -> Self {
        Self {
            results: results.into_iter().map(ResultDto::from).collect(),
        }
    }
}

impl From<Vec<ResultRecord>> for UserResultsEnvelope {
    fn from(results: Vec<ResultRecord>) -> Self {
        Self {
            user_results: results.into_iter().map(ResultDto::from).collect(),
        }
    }
}
