/*
 * Responsibility
 * - URL 構造を定義
 * - /ping は公開、/protected 配下は session token 必須
 */
use axum::{Router, routing::get};

use crate::api::handlers::{ping::ping, protected::protected_ping};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/protected/ping", get(protected_ping));
    let protected = middleware::auth::session::apply(protected, state);

    Router::new().route("/ping", get(ping)).merge(protected)
}
