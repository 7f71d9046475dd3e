//! SeaORM-backed repository implementations for the domain ports.
//!
//! Both structs are generic over `C: ConnectionTrait`, so they can be built
//! with a `DatabaseConnection` or a transactional connection.

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde_json::Value;

use crate::contract::model::{NewUser, ResultRecord, User};
use crate::domain::repo::{RepoError, RepoResult, ResultsRepository, UsersRepository};
use crate::infra::storage::entity::{result, user};
use crate::infra::storage::mapper::result_to_contract;

/// Writes distinguish UNIQUE violations so the domain can answer with a conflict.
fn map_write_err(err: DbErr, what: &'static str) -> RepoError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return RepoError::UniqueViolation;
    }
    RepoError::Backend(anyhow::Error::new(err).context(what))
}

fn join_owner(
    (row, owner): (result::Model, Option<user::Model>),
) -> RepoResult<ResultRecord> {
    let owner = owner.ok_or_else(|| {
        anyhow!(
            "result {} references missing user {}",
            row.id,
            row.user_id
        )
    })?;
    Ok(result_to_contract(row, owner))
}

/// SeaORM user repository.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> RepoResult<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("find_by_username failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, new_user: NewUser) -> RepoResult<User> {
        let m = user::ActiveModel {
            id: NotSet,
            username: Set(new_user.username),
            email: Set(new_user.email),
            password: Set(new_user.password),
            enabled: Set(new_user.enabled),
        };
        let saved = m
            .insert(&self.conn)
            .await
            .map_err(|e| map_write_err(e, "insert user failed"))?;
        Ok(saved.into())
    }

    async fn update(&self, u: User) -> RepoResult<User> {
        let m = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username),
            email: Set(u.email),
            password: Set(u.password),
            enabled: Set(u.enabled),
        };
        let saved = m
            .update(&self.conn)
            .await
            .map_err(|e| map_write_err(e, "update user failed"))?;
        Ok(saved.into())
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let res = user::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete user failed")?;
        Ok(res.rows_affected > 0)
    }
}

/// SeaORM result repository. Every read joins the owning user.
pub struct SeaOrmResultsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmResultsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    async fn owner_of(&self, row: result::Model) -> RepoResult<ResultRecord> {
        let owner = user::Entity::find_by_id(row.user_id)
            .one(&self.conn)
            .await
            .context("load result owner failed")?;
        join_owner((row, owner))
    }
}

#[async_trait::async_trait]
impl<C> ResultsRepository for SeaOrmResultsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> RepoResult<Option<ResultRecord>> {
        let found = result::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        found.map(join_owner).transpose()
    }

    async fn find_all(&self) -> RepoResult<Vec<ResultRecord>> {
        let rows = result::Entity::find()
            .find_also_related(user::Entity)
            .order_by_asc(result::Column::Id)
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        rows.into_iter().map(join_owner).collect()
    }

    async fn find_by_user(&self, user_id: i32) -> RepoResult<Vec<ResultRecord>> {
        let rows = result::Entity::find()
            .filter(result::Column::UserId.eq(user_id))
            .find_also_related(user::Entity)
            .order_by_asc(result::Column::Id)
            .all(&self.conn)
            .await
            .context("find_by_user failed")?;
        rows.into_iter().map(join_owner).collect()
    }

    async fn insert(
        &self,
        value: Value,
        owner: User,
        time: DateTime<Utc>,
    ) -> RepoResult<ResultRecord> {
        let m = result::ActiveModel {
            id: NotSet,
            result: Set(value),
            user_id: Set(owner.id),
            time: Set(time),
        };
        let saved = m
            .insert(&self.conn)
            .await
            .map_err(|e| map_write_err(e, "insert result failed"))?;
        Ok(ResultRecord {
            id: saved.id,
            result: saved.result,
            user: owner,
            time: saved.time,
        })
    }

    async fn update(&self, record: ResultRecord) -> RepoResult<ResultRecord> {
        let m = result::ActiveModel {
            id: Set(record.id),
            result: Set(record.result),
            user_id: Set(record.user.id),
            time: Set(record.time),
        };
        let saved = m
            .update(&self.conn)
            .await
            .map_err(|e| map_write_err(e, "update result failed"))?;
        self.owner_of(saved).await
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let res = result::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete result failed")?;
        Ok(res.rows_affected > 0)
    }
}
