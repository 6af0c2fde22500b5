pub mod factory;
pub mod session_token;
pub mod shop_domain;

pub use factory::build_session_verifier;
pub use session_token::{SessionClaims, SessionError, SessionVerifier, VerifiedSession};
