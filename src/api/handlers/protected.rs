/*
 * Responsibility
 * - GET /protected/ping (session token 必須)
 * - 検証済み claims をそのまま返す (フロントからの疎通確認用)
 */
use axum::Json;
use serde::Serialize;

use crate::api::extractors::SessionCtx;
use crate::services::auth::SessionClaims;

#[derive(Debug, Serialize)]
pub struct ProtectedPingResponse {
    pub ok: bool,
    pub claims: SessionClaims,
}

pub async fn protected_ping(SessionCtx(session): SessionCtx) -> Json<ProtectedPingResponse> {
    tracing::debug!(
        shop = %session.shop(),
        sub = ?session.claims().subject(),
        "protected ping"
    );

    Json(ProtectedPingResponse {
        ok: true,
        claims: session.into_claims(),
    })
}
