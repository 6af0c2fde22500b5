/*
 * Responsibility
 * - GET /ping (疎通用, 認証なし)
 */
use axum::{http::header, response::IntoResponse};

pub async fn ping() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "pong")
}
