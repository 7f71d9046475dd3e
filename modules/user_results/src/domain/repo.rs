use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::contract::model::{NewUser, ResultRecord, User};

/// Failure reported by a repository adapter.
#[derive(Error, Debug)]
pub enum RepoError {
    /// A UNIQUE constraint rejected the write.
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Port for the domain layer: user persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: i32) -> RepoResult<Option<User>>;
    /// All users, ordered by id.
    async fn find_all(&self) -> RepoResult<Vec<User>>;
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Insert a validated user; the store assigns the id.
    async fn insert(&self, new_user: NewUser) -> RepoResult<User>;
    /// Overwrite an existing user (by primary key in `user.id`).
    async fn update(&self, user: User) -> RepoResult<User>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i32) -> RepoResult<bool>;
}

/// Port for result persistence. Records are always returned with their owner loaded.
#[async_trait]
pub trait ResultsRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> RepoResult<Option<ResultRecord>>;
    async fn find_all(&self) -> RepoResult<Vec<ResultRecord>>;
    async fn find_by_user(&self, user_id: i32) -> RepoResult<Vec<ResultRecord>>;
    async fn insert(
        &self,
        result: Value,
        owner: User,
        time: DateTime<Utc>,
    ) -> RepoResult<ResultRecord>;
    async fn update(&self, record: ResultRecord) -> RepoResult<ResultRecord>;
    async fn delete(&self, id: i32) -> RepoResult<bool>;
}
