use axum::{http::StatusCode, response::IntoResponse};

pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Talky avatar backend is running")
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
