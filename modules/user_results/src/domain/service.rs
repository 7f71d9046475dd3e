use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{ResultInput, ResultRecord, User, UserInput};
use crate::domain::error::DomainError;
use crate::domain::repo::{ResultsRepository, UsersRepository};
use crate::domain::validation::{
    apply_result_update, apply_user_update, parse_user_ref, validate_create_result,
    validate_create_user, validate_result_update,
};

/// Domain service for users and their results.
/// Depends only on the repository ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    results: Arc<dyn ResultsRepository>,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(users: Arc<dyn UsersRepository>, results: Arc<dyn ResultsRepository>) -> Self {
        Self { users, results }
    }

    // --- users ---

    #[instrument(name = "user_results.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.find_all().await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "user_results.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i32) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// Lookup by username; absence is not an error.
    #[instrument(name = "user_results.service.find_user_by_username", skip(self))]
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_username(username).await?)
    }

    #[instrument(
        name = "user_results.service.create_user",
        skip(self, input),
        fields(username = ?input.username)
    )]
    pub async fn create_user(&self, input: UserInput) -> Result<User, DomainError> {
        info!("Creating new user");

        let new_user = validate_create_user(input)?;

        if self.users.find_by_username(&new_user.username).await?.is_some()
            || self.users.find_by_email(&new_user.email).await?.is_some()
        {
            warn!(email = %new_user.email, "Username or email already taken");
            return Err(DomainError::DuplicateUser);
        }

        // The UNIQUE constraints catch a concurrent create that slipped past the check above.
        let user = self.users.insert(new_user).await?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(
        name = "user_results.service.update_user",
        skip(self, patch),
        fields(user_id = id)
    )]
    pub async fn update_user(&self, id: i32, patch: UserInput) -> Result<User, DomainError> {
        info!("Updating user");

        let mut current = self.get_user(id).await?;

        if patch.is_empty() {
            return Err(DomainError::EmptyUserUpdate);
        }

        if let Some(username) = patch.username.as_deref() {
            self.ensure_unclaimed(id, self.users.find_by_username(username).await?)?;
        }
        if let Some(email) = patch.email.as_deref() {
            self.ensure_unclaimed(id, self.users.find_by_email(email).await?)?;
        }

        apply_user_update(&mut current, patch);
        let updated = self.users.update(current).await?;

        info!("Successfully updated user");
        Ok(updated)
    }

    #[instrument(name = "user_results.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        info!("Deleting user");

        if !self.users.delete(id).await? {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    // --- results ---

    #[instrument(name = "user_results.service.list_results", skip(self))]
    pub async fn list_results(&self) -> Result<Vec<ResultRecord>, DomainError> {
        let results = self.results.find_all().await?;
        debug!("Listed {} results", results.len());
        Ok(results)
    }

    #[instrument(name = "user_results.service.get_result", skip(self), fields(result_id = id))]
    pub async fn get_result(&self, id: i32) -> Result<ResultRecord, DomainError> {
        self.results
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::result_not_found(id))
    }

    /// Results owned by the referenced user. An unknown or malformed reference yields an empty list.
    #[instrument(name = "user_results.service.list_results_by_user", skip(self))]
    pub async fn list_results_by_user(&self, user_ref: &str) -> Result<Vec<ResultRecord>, DomainError> {
        match user_ref.trim().parse::<i32>() {
            Ok(user_id) => Ok(self.results.find_by_user(user_id).await?),
            Err(_) => {
                debug!("Non-numeric user reference, nothing to match");
                Ok(Vec::new())
            }
        }
    }

    #[instrument(name = "user_results.service.create_result", skip(self, input))]
    pub async fn create_result(&self, input: ResultInput) -> Result<ResultRecord, DomainError> {
        info!("Creating new result");

        let new_result = validate_create_result(input)?;
        let owner = self.resolve_user_reference(&new_result.user_ref).await?;
        let record = self
            .results
            .insert(new_result.result, owner, new_result.time)
            .await?;

        info!("Successfully created result with id={}", record.id);
        Ok(record)
    }

    #[instrument(
        name = "user_results.service.update_result",
        skip(self, input),
        fields(result_id = id)
    )]
    pub async fn update_result(&self, id: i32, input: ResultInput) -> Result<ResultRecord, DomainError> {
        info!("Updating result");

        let mut current = self.get_result(id).await?;
        let update = validate_result_update(input)?;

        let owner = match &update.user_ref {
            Some(user_ref) => Some(self.resolve_user_reference(user_ref).await?),
            None => None,
        };

        apply_result_update(&mut current, update, owner);
        let updated = self.results.update(current).await?;

        info!("Successfully updated result");
        Ok(updated)
    }

    #[instrument(name = "user_results.service.delete_result", skip(self), fields(result_id = id))]
    pub async fn delete_result(&self, id: i32) -> Result<(), DomainError> {
        info!("Deleting result");

        if !self.results.delete(id).await? {
            return Err(DomainError::result_not_found(id));
        }

        info!("Successfully deleted result");
        Ok(())
    }

    /// Load the user a payload points at.
    pub async fn resolve_user_reference(&self, user_ref: &Value) -> Result<User, DomainError> {
        let id = parse_user_ref(user_ref)
            .ok_or_else(|| DomainError::user_reference_not_found(user_ref))?;

        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_reference_not_found(id))
    }

    // --- helpers ---

    fn ensure_unclaimed(&self, id: i32, holder: Option<User>) -> Result<(), DomainError> {
        match holder {
            Some(other) if other.id != id => {
                warn!(other_id = other.id, "Username or email belongs to another user");
                Err(DomainError::DuplicateUser)
            }
            _ => Ok(()),
        }
    }
}
