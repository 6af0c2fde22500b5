/*
 * Responsibility
 * - ドメインロジック (HTTP に依存しない検証処理)
 */
pub mod auth;
