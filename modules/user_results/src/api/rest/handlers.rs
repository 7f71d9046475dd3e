use std::sync::Arc;

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use tracing::info;

use crate::api::rest::dto::{
    CreateResultReq, CreateUserReq, MaybeUserEnvelope, ResultEnvelope, ResultListEnvelope,
    UpdateResultReq, UpdateUserReq, UserEnvelope, UserListEnvelope, UserResultsEnvelope,
};
use crate::api::rest::error::ApiError;
use crate::api::rest::extract::{EntityId, JsonPayload};
use crate::domain::service::Service;

/// `Allow` value for collection paths.
pub const ALLOW_COLLECTION: &str = "GET,POST";
/// `Allow` value for item paths.
pub const ALLOW_ITEM: &str = "GET,PUT,DELETE";

// ----- users -----

/// List all users
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<UserListEnvelope>, ApiError> {
    info!("Listing users");
    let users = svc.list_users().await?;
    Ok(Json(users.into()))
}

/// Get a specific user by ID
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    EntityId(id): EntityId,
) -> Result<Json<UserEnvelope>, ApiError> {
    info!("Getting user with id: {}", id);
    let user = svc.get_user(id).await?;
    Ok(Json(UserEnvelope { user: user.into() }))
}

/// Get a user by username; answers `{"user": null}` when nobody matches
pub async fn get_user_by_username(
    Extension(svc): Extension<Arc<Service>>,
    Path(username): Path<String>,
) -> Result<Json<MaybeUserEnvelope>, ApiError> {
    info!("Getting user with username: {}", username);
    let user = svc.find_user_by_username(&username).await?;
    Ok(Json(MaybeUserEnvelope {
        user: user.map(Into::into),
    }))
}

/// Create a new user
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    payload: JsonPayload<CreateUserReq>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    info!("Creating user");
    let user = svc
        .create_user(payload.into_inner_or_default().into())
        .await?;
    Ok((StatusCode::CREATED, Json(UserEnvelope { user: user.into() })))
}

/// Update an existing user
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    EntityId(id): EntityId,
    payload: JsonPayload<UpdateUserReq>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    info!("Updating user {}", id);
    let user = svc
        .update_user(id, payload.into_inner_or_default().into())
        .await?;
    Ok((StatusCode::ACCEPTED, Json(UserEnvelope { user: user.into() })))
}

/// Delete a user by ID
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    info!("Deleting user: {}", id);
    svc.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- results -----

/// List all results
pub async fn list_results(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<ResultListEnvelope>, ApiError> {
    info!("Listing results");
    let results = svc.list_results().await?;
    Ok(Json(results.into()))
}

/// Get a specific result by ID
pub async fn get_result(
    Extension(svc): Extension<Arc<Service>>,
    EntityId(id): EntityId,
) -> Result<Json<ResultEnvelope>, ApiError> {
    info!("Getting result with id: {}", id);
    let result = svc.get_result(id).await?;
    Ok(Json(ResultEnvelope {
        result: result.into(),
    }))
}

/// List the results of one user; an unknown user yields an empty list
pub async fn list_results_by_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResultsEnvelope>, ApiError> {
    info!("Listing results of user {}", user_id);
    let results = svc.list_results_by_user(&user_id).await?;
    Ok(Json(results.into()))
}

/// Create a new result
pub async fn create_result(
    Extension(svc): Extension<Arc<Service>>,
    payload: JsonPayload<CreateResultReq>,
) -> Result<(StatusCode, Json<ResultEnvelope>), ApiError> {
    info!("Creating result");
    let result = svc
        .create_result(payload.into_inner_or_default().into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ResultEnvelope {
            result: result.into(),
        }),
    ))
}

/// Update an existing result
pub async fn update_result(
    Extension(svc): Extension<Arc<Service>>,
    EntityId(id): EntityId,
    payload: JsonPayload<UpdateResultReq>,
) -> Result<(StatusCode, Json<ResultEnvelope>), ApiError> {
    info!("Updating result {}", id);
    let result = svc
        .update_result(id, payload.into_inner_or_default().into())
        .await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ResultEnvelope {
            result: result.into(),
        }),
    ))
}

/// Delete a result by ID
pub async fn delete_result(
    Extension(svc): Extension<Arc<Service>>,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    info!("Deleting result: {}", id);
    svc.delete_result(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- OPTIONS -----

pub async fn options_collection() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::ALLOW, ALLOW_COLLECTION)],
        Json(json!([])),
    )
}

pub async fn options_item() -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, ALLOW_ITEM)], Json(json!([])))
}
