use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub const USERS_API_PATH: &str = "/api/v1/users";
pub const RESULTS_API_PATH: &str = "/api/v1/results";

/// Attach the user and result endpoints to `router`, sharing `service` via an extension.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // Users
        .route(
            USERS_API_PATH,
            get(handlers::list_users)
                .post(handlers::create_user)
                .options(handlers::options_collection),
        )
        .route(
            &format!("{USERS_API_PATH}/{{id}}"),
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user)
                .options(handlers::options_item),
        )
        .route(
            &format!("{USERS_API_PATH}/username/{{username}}"),
            get(handlers::get_user_by_username),
        )
        // Results
        .route(
            RESULTS_API_PATH,
            get(handlers::list_results)
                .post(handlers::create_result)
                .options(handlers::options_collection),
        )
        .route(
            &format!("{RESULTS_API_PATH}/{{id}}"),
            get(handlers::get_result)
                .put(handlers::update_result)
                .delete(handlers::delete_result)
                .options(handlers::options_item),
        )
        .route(
            &format!("{RESULTS_API_PATH}/user/{{user_id}}"),
            get(handlers::list_results_by_user),
        )
        .layer(Extension(service))
}
