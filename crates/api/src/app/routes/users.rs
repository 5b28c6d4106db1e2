use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::{get, put},
    Json, Router,
};

use userbase_core::UserId;

use crate::app::dto::{ErrorBody, UserEnvelope, UserListEnvelope, UserRequest};
use crate::app::errors::ApiError;
use crate::app::routes::common::ValidJson;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", put(update_user).delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Every stored user", body = UserListEnvelope),
        (status = 502, description = "Database unreachable or rejected the query", body = ErrorBody),
    )
)]
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<UserListEnvelope>, ApiError> {
    let users = services.users.list().await?;
    Ok(Json(users.into()))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 200, description = "The created user, or null if the database returned no row", body = UserEnvelope),
        (status = 400, description = "Missing or blank name/email", body = ErrorBody),
        (status = 409, description = "Rejected by a database constraint", body = ErrorBody),
        (status = 502, description = "Database unreachable or rejected the query", body = ErrorBody),
    )
)]
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    ValidJson(body): ValidJson<UserRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let created = services.users.create(&body.into_draft()).await?;
    if let Some(user) = &created {
        tracing::info!(user_id = %user.id, "user created");
    }
    Ok(Json(created.into()))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id (not format-checked)")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "The updated user, or null if no user has this id", body = UserEnvelope),
        (status = 400, description = "Missing or blank name/email", body = ErrorBody),
        (status = 404, description = "No user has this id (strict mode only)", body = ErrorBody),
        (status = 502, description = "Database unreachable or rejected the query", body = ErrorBody),
    )
)]
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<UserRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let id = UserId::from(id);
    let updated = services.users.update(&id, &body.into_draft()).await?;
    if updated.is_none() {
        tracing::debug!(user_id = %id, "update matched no user");
        if services.strict_not_found {
            return Err(ApiError::NotFound(format!("user {id} not found")));
        }
    }
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id (not format-checked)")),
    responses(
        (status = 200, description = "The deleted user, or null if no user has this id", body = UserEnvelope),
        (status = 404, description = "No user has this id (strict mode only)", body = ErrorBody),
        (status = 502, description = "Database unreachable or rejected the query", body = ErrorBody),
    )
)]
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let id = UserId::from(id);
    let deleted = services.users.delete(&id).await?;
    match &deleted {
        Some(user) => tracing::info!(user_id = %user.id, "user deleted"),
        None if services.strict_not_found => {
            return Err(ApiError::NotFound(format!("user {id} not found")));
        }
        None => tracing::debug!(user_id = %id, "delete matched no user"),
    }
    Ok(Json(deleted.into()))
}
