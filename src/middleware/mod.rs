/*
 * Responsibility
 * - middleware の公開インターフェース
 * - cors::apply, http::apply, auth::session::apply
 */
pub mod auth;
pub mod cors;
pub mod http;
