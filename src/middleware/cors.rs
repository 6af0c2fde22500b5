//! CORS policy for the embedded app frontend.
//!
//! Policy:
//! - Allow-Origin: `*`, WITHOUT credentials (the session token travels in `Authorization`).
//! - Every response carries the CORS headers, including 401s from the session gate.
//! - Any `OPTIONS` request is answered with 204 right here, before routing and before
//!   the session gate runs.
//!
//! `tower_http::cors::CorsLayer` only short-circuits real preflights (those carrying
//! `Access-Control-Request-Method`) and answers them with 200, so the policy is spelled
//! out with header layers instead.

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Authorization, Content-Type";

/// Apply CORS policy to the given Router.
///
/// Must be the outermost application layer so that preflights never reach the
/// session gate.
pub fn apply(router: Router) -> Router {
    router
        .layer(middleware::from_fn(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
}

async fn preflight(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(req).await
}
