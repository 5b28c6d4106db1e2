use axum::{routing::get, Router};

pub mod common;
pub mod docs;
pub mod system;
pub mod users;

/// Router for every resource endpoint plus documentation.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/users", users::router())
        .merge(docs::router())
}
