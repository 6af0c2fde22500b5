//! Shopify session token 検証 → VerifiedSession を extensions に入れる
//!
//! 検証ロジック自体は `services::auth::session_token` 側。ここは HTTP との接続だけ:
//! - `Authorization` ヘッダを verifier に渡す
//! - 失敗時は 401 (text/plain, 理由のみ) を返し、handler は呼ばない
//! - 成功時は `VerifiedSession` を request extensions に格納する

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// 保護したいルートに session token 検証を掛ける。
///
/// `route_layer` なので、マッチしなかったパスは 401 ではなく 404 のまま。
///
/// ```ignore
/// let protected = Router::new().route("/protected/ping", get(protected_ping));
/// let protected = middleware::auth::session::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, session_middleware))
}

async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = match state
        .session
        .verify_header(req.headers().get(header::AUTHORIZATION))
    {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(
                reason = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "session token rejected"
            );
            return Err(err.into());
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
