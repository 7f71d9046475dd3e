//! HTTP host: wraps module routes in the shared middleware stack and serves them.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Owns the ingress configuration and turns module routers into a served application.
#[derive(Debug, Clone, Default)]
pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Add `/health` to `routes` and install the middleware stack.
    pub fn build_router(&self, routes: Router) -> Router {
        tracing::debug!("Building router");
        let mut router = routes.route("/health", get(web::health_check));

        // Each layer wraps the ones added before it, so the request passes through
        // them bottom-up: SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
        // -> CORS -> Timeout -> BodyLimit -> handler.
        let x_request_id = crate::request_id::header();

        // 1. Body limit, enforced by tower-http instead of axum's 2MB extractor default
        router = router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        // 2. Handler timeout
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            self.config.request_timeout_secs,
        )));

        // 3. CORS (if enabled)
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        // 4. Put request_id into extensions and span
        router = router.layer(from_fn(crate::request_id::push_req_id_to_extensions));

        // 5. Trace with request_id/status/latency
        router = router.layer(crate::request_id::create_trace_layer());

        // 6. Echo x-request-id on the response
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

        // 7. Generate x-request-id when the client sent none
        router = router.layer(SetRequestIdLayer::new(
            x_request_id,
            crate::request_id::MakeReqId,
        ));

        router
    }

    /// Bind `addr` and serve `router` until `shutdown` resolves.
    pub async fn serve<F>(&self, router: Router, addr: SocketAddr, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
