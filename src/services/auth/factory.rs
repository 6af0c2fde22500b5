//! Factory: build `SessionVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::SessionVerifier;

pub fn build_session_verifier(config: &Config) -> Arc<SessionVerifier> {
    Arc::new(SessionVerifier::new(
        config.shopify_api_key.clone(),
        config.shopify_api_secret(),
    ))
}
