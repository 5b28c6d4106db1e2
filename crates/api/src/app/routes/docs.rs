//! OpenAPI document and the interactive reference page.

use std::sync::OnceLock;

use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

use crate::app::dto::{ErrorBody, UserDto, UserEnvelope, UserListEnvelope, UserRequest};
use crate::app::routes::{system, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "userbase",
        description = "CRUD over the users table of a hosted database."
    ),
    paths(
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        system::health,
    ),
    components(schemas(UserRequest, UserDto, UserEnvelope, UserListEnvelope, ErrorBody)),
    tags(
        (name = "users", description = "The users resource"),
        (name = "system", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// The generated document, built once per process.
pub fn openapi() -> &'static utoipa::openapi::OpenApi {
    static DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();
    DOC.get_or_init(ApiDoc::openapi)
}

pub fn router() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(docs_page))
}

async fn openapi_json() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], Json(openapi()))
}

async fn docs_page() -> Html<&'static str> {
    Html(DOCS_HTML)
}

// Stoplight Elements from the CDN, pointed at our own document.
const DOCS_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>userbase API reference</title>
    <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css" />
  </head>
  <body>
    <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
  </body>
</html>
"#;
