//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the injected repository and per-request policy
//! - `routes/`: HTTP routes + handlers, and the OpenAPI/docs endpoints
//! - `dto.rs`: request/response DTOs (also the documented schemas)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: services::AppServices, cors: &CorsConfig) -> Router {
    routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::security_headers))
                .layer(middleware::cors_layer(cors)),
        )
}
