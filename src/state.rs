/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - session: 起動時に作った SessionVerifier (読み取り専用)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::SessionVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub session: Arc<SessionVerifier>,
}

impl AppState {
    pub fn new(session: Arc<SessionVerifier>) -> Self {
        Self { session }
    }
}
