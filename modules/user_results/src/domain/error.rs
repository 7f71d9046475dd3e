use thiserror::Error;

use crate::domain::repo::RepoError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Username or email already taken")]
    DuplicateUser,

    #[error("Username and email must be provided")]
    MissingCredentials,

    #[error("Fields result, user_id and time must be provided")]
    MissingResultFields,

    #[error("At least one of result, user_id or time must be provided")]
    EmptyResultUpdate,

    #[error("Update body is empty")]
    EmptyUserUpdate,

    #[error("User reference not found: {reference}")]
    UserReferenceNotFound { reference: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "User",
            id: id.to_string(),
        }
    }

    pub fn result_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Result",
            id: id.to_string(),
        }
    }

    pub fn user_reference_not_found(reference: impl ToString) -> Self {
        Self::UserReferenceNotFound {
            reference: reference.to_string(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::UniqueViolation => Self::DuplicateUser,
            // {:#} keeps the anyhow context chain in the message
            RepoError::Backend(inner) => Self::database(format!("{inner:#}")),
        }
    }
}
