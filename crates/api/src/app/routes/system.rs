use axum::http::StatusCode;

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Process is up"))
)]
pub async fn health() -> StatusCode {
    StatusCode::OK
}
