use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Wire shape of every error: `code` mirrors the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: u16,
    pub message: String,
}

/// Handler-level error rendered as an [`ErrorEnvelope`].
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            code: self.status.as_u16(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map domain error to the `{code, message}` envelope
impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => Self::not_found(),
            DomainError::DuplicateUser => Self::new(StatusCode::CONFLICT, "DUPLICATED USER"),
            DomainError::MissingCredentials => {
                Self::unprocessable("All credentials must be filled")
            }
            DomainError::MissingResultFields => {
                Self::unprocessable("Parameters result, user_id and time are required")
            }
            DomainError::EmptyResultUpdate => {
                Self::unprocessable("There must be at least one parameter")
            }
            DomainError::EmptyUserUpdate => Self::bad_request("BAD REQUEST"),
            DomainError::UserReferenceNotFound { .. } => Self::bad_request("User Id Not Found"),
            DomainError::Database { .. } => {
                // Log the internal error details but don't expose them to the client
                tracing::error!(error = %e, "Database error occurred");
                Self::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::user_not_found(1), StatusCode::NOT_FOUND),
            (DomainError::DuplicateUser, StatusCode::CONFLICT),
            (DomainError::MissingCredentials, StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::MissingResultFields, StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::EmptyResultUpdate, StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::EmptyUserUpdate, StatusCode::BAD_REQUEST),
            (
                DomainError::user_reference_not_found(99),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::database("connection reset"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn database_details_are_not_exposed() {
        let api = ApiError::from(DomainError::database("password=hunter2"));
        assert_eq!(api.message, "Internal Server Error");
    }

    #[tokio::test]
    async fn envelope_code_matches_status() {
        let resp = ApiError::from(DomainError::result_not_found(5)).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let envelope: ErrorEnvelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            envelope,
            ErrorEnvelope {
                code: 404,
                message: "Not Found".into()
            }
        );
    }
}
