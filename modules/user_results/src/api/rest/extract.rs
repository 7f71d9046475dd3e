//! Request extractors with the envelope-shaped rejections the handlers need.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::rest::error::ApiError;

/// Integer id taken from the `{id}` path segment. Anything unparseable is a 404,
/// since no entity can live at that address.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i32);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found())?;
        raw.trim()
            .parse()
            .map(Self)
            .map_err(|_| ApiError::not_found())
    }
}

/// Lenient JSON body: `None` when the body is empty or not a readable object of `T`.
/// Each handler decides what a missing payload means for its operation.
#[derive(Debug, Clone)]
pub struct JsonPayload<T>(pub Option<T>);

impl<S, T> FromRequest<S> for JsonPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Self(Some(value))),
            Err(e) => {
                debug!(error = %e, "Unreadable JSON payload");
                Ok(Self(None))
            }
        }
    }
}

impl<T: Default> JsonPayload<T> {
    pub fn into_inner_or_default(self) -> T {
        self.0.unwrap_or_default()
    }
}
