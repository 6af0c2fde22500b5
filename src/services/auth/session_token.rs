//! Shopify session token (App Bridge `id_token`) verification.
//!
//! The verifier is a linear chain of gates. The first failing gate decides the
//! rejection reason, nothing is retried, and a `VerifiedSession` only exists once
//! every gate has passed:
//!
//! 1. `Authorization: Bearer <token>` extraction
//! 2. algorithm allow-list (HS256) + signature + `exp`/`nbf` with a 5 second leeway
//! 3. `aud` == API key
//! 4. `iss` present
//! 5. `dest` present and a non-blank string
//! 6. `iss` host == `dest` host

use std::fmt;

use axum::http::HeaderValue;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::shop_domain;

/// Clock skew tolerated on `exp` / `nbf`, seconds.
pub const TOKEN_LEEWAY_SECONDS: u64 = 5;

const BEARER_PREFIX: &str = "Bearer ";

// Anything else (`none`, RS*/ES*/EdDSA, other HMAC sizes) is refused before signature checks.
const ALLOWED_ALGORITHMS: &[Algorithm] = &[Algorithm::HS256];

/// Rejection reasons. `Display` is the exact body of the 401 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("invalid Authorization header format")]
    InvalidHeaderFormat,
    #[error("missing bearer token")]
    MissingBearerToken,
    #[error("invalid session token")]
    InvalidToken,
    #[error("invalid token audience")]
    InvalidAudience,
    #[error("missing issuer")]
    MissingIssuer,
    #[error("missing destination")]
    MissingDestination,
    #[error("invalid destination")]
    InvalidDestination,
    #[error("issuer and destination mismatch")]
    IssuerDestinationMismatch,
}

/// Decoded session token payload.
///
/// Kept as a raw claim map so unknown claims (`jti`, `sid`, `sig`, ...) survive
/// for the audit log and for handlers that echo them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionClaims(Map<String, Value>);

impl SessionClaims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.0.get("iss").and_then(Value::as_str)
    }

    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    /// First `aud` value. `aud` may be a string or an array of strings;
    /// an array holding anything but strings counts as absent.
    pub fn audience(&self) -> Option<&str> {
        match self.0.get("aud")? {
            Value::String(aud) => Some(aud),
            Value::Array(values) if values.iter().all(Value::is_string) => {
                values.first().and_then(Value::as_str)
            }
            _ => None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("exp")
    }

    fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        let secs = self.0.get(name)?.as_i64()?;
        DateTime::from_timestamp(secs, 0)
    }
}

impl fmt::Display for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A session token that passed every gate.
///
/// There is no public constructor: holding one means the verifier accepted it.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedSession {
    claims: SessionClaims,
    shop: String,
}

impl VerifiedSession {
    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    /// Normalized shop host shared by `iss` and `dest` (e.g. `my-shop.myshopify.com`).
    pub fn shop(&self) -> &str {
        &self.shop
    }

    pub fn into_claims(self) -> SessionClaims {
        self.claims
    }
}

/// HS256 session token verifier bound to one Shopify app (API key + secret).
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct SessionVerifier {
    api_key: String,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("SessionVerifier")
            .field("api_key", &self.api_key)
            .field("validation", &self.validation)
            .finish()
    }
}

impl SessionVerifier {
    pub fn new(api_key: impl Into<String>, api_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ALLOWED_ALGORITHMS.to_vec();
        validation.leeway = TOKEN_LEEWAY_SECONDS;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // `aud` is checked by hand so it gets its own rejection reason.
        validation.validate_aud = false;

        Self {
            api_key: api_key.into(),
            decoding_key: DecodingKey::from_secret(api_secret.as_bytes()),
            validation,
        }
    }

    /// Run the whole pipeline against a raw `Authorization` header value.
    pub fn verify_header(
        &self,
        authorization: Option<&HeaderValue>,
    ) -> Result<VerifiedSession, SessionError> {
        let token = bearer_token(authorization)?;
        self.verify_token(token)
    }

    /// Run every gate after header extraction against a bare token.
    pub fn verify_token(&self, token: &str) -> Result<VerifiedSession, SessionError> {
        let claims = self.decode(token)?;

        if claims.audience() != Some(self.api_key.as_str()) {
            return Err(SessionError::InvalidAudience);
        }

        let iss = claims
            .issuer()
            .filter(|iss| !iss.is_empty())
            .ok_or(SessionError::MissingIssuer)?;

        let dest = match claims.get("dest") {
            None => return Err(SessionError::MissingDestination),
            Some(Value::String(dest)) if !dest.trim().is_empty() => dest,
            Some(_) => return Err(SessionError::InvalidDestination),
        };

        let shop = match (shop_domain::issuer_host(iss), shop_domain::destination_host(dest)) {
            (Some(iss_host), Some(dest_host)) if iss_host == dest_host => dest_host,
            _ => return Err(SessionError::IssuerDestinationMismatch),
        };

        info!(
            claims = %claims,
            shop = %shop,
            expires_at = ?claims.expires_at(),
            "shopify session token verified"
        );

        Ok(VerifiedSession { claims, shop })
    }

    fn decode(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let header = match jsonwebtoken::decode_header(token) {
            Ok(header) => header,
            Err(err) => {
                warn!(error = %err, token_well_formed = false, "invalid session token");
                return Err(SessionError::InvalidToken);
            }
        };

        let well_formed = token.split('.').count() == 3;

        if !ALLOWED_ALGORITHMS.contains(&header.alg) {
            warn!(
                alg = ?header.alg,
                token_well_formed = well_formed,
                "invalid session token: signing algorithm not allowed"
            );
            return Err(SessionError::InvalidToken);
        }

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                warn!(error = %err, token_well_formed = well_formed, "invalid session token");
                SessionError::InvalidToken
            })
    }
}

fn bearer_token(authorization: Option<&HeaderValue>) -> Result<&str, SessionError> {
    let value = authorization.ok_or(SessionError::MissingHeader)?;
    let raw = value
        .to_str()
        .map_err(|_| SessionError::InvalidHeaderFormat)?
        .trim();

    if raw.is_empty() {
        return Err(SessionError::MissingHeader);
    }

    let token = raw
        .strip_prefix(BEARER_PREFIX)
        .ok_or(SessionError::InvalidHeaderFormat)?
        .trim();

    if token.is_empty() {
        return Err(SessionError::MissingBearerToken);
    }
    Ok(token)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io;
    use std::sync::{Arc, Mutex};

    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::{Value, json};
    use tracing_subscriber::fmt::MakeWriter;

    pub const API_KEY: &str = "test-key";
    pub const API_SECRET: &str = "test-secret";

    pub fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    /// Claims shaped like the ones App Bridge issues for `test-shop`.
    pub fn valid_claims() -> Value {
        let now = now();
        json!({
            "iss": "https://test-shop.myshopify.com/admin",
            "dest": "https://test-shop.myshopify.com",
            "aud": API_KEY,
            "sub": "42",
            "exp": now + 120,
            "nbf": now - 60,
            "iat": now,
            "jti": "00000000-0000-4000-8000-000000000000",
            "sid": "session-id",
        })
    }

    pub fn sign(claims: &Value, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign token")
    }

    pub fn valid_token() -> String {
        sign(&valid_claims(), API_SECRET)
    }

    /// In-memory log sink for `tracing_subscriber::fmt`.
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, logs.contents())
    }
}
