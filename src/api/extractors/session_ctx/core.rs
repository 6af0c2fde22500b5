use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::VerifiedSession;

/// Handler で VerifiedSession を受け取るための extractor
/// session middleware が request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（middleware 未設定のルート）
///
/// `Option<SessionCtx>` にすれば「未検証」を None として受け取れる。
#[derive(Debug, Clone)]
pub struct SessionCtx(pub VerifiedSession);

impl<S> FromRequestParts<S> for SessionCtx
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedSession>()
            .cloned()
            .map(SessionCtx)
            .ok_or_else(|| {
                tracing::error!("SessionCtx requested on a route without the session middleware");
                StatusCode::UNAUTHORIZED
            })
    }
}

impl<S> OptionalFromRequestParts<S> for SessionCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<VerifiedSession>().cloned().map(SessionCtx))
    }
}
