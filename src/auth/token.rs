//! Token issuance and verification.
//!
//! Tokens are HS512-signed JWTs. Validity is fully determined by the
//! signature, the embedded claims, and the process epoch at verification
//! time; nothing is persisted server-side. Restarting the process advances
//! the epoch and thereby invalidates every outstanding token at once.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::claims::Claims;
use super::error::AuthError;
use crate::user::User;

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_MS: i64 = 86_400_000;

/// Issues and verifies signed access tokens.
///
/// The signing key and epoch are fixed at construction and never mutated, so
/// a single instance is safe to share across request handlers unsynchronized.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_ms: i64,
    epoch_ms: i64,
}

impl TokenService {
    /// Create a token service bound to a signing secret and process epoch.
    ///
    /// `epoch_ms` must be captured once at process startup (Unix
    /// milliseconds); tokens minted under an earlier epoch fail verification.
    pub fn new(secret: &str, token_ttl_ms: i64, epoch_ms: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        // Expiry is checked by hand after the epoch comparison so that a
        // stale-epoch token reports InvalidToken even when it is also expired.
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_ttl_ms,
            epoch_ms,
        }
    }

    /// Issue a signed token for a user with the configured TTL.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_with_ttl(user, self.token_ttl_ms)
    }

    /// Issue a signed token with an explicit TTL in milliseconds.
    pub(crate) fn issue_with_ttl(&self, user: &User, ttl_ms: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.email.clone(),
            user_id: user.id.clone(),
            role: user.role,
            district: user.district.clone(),
            state: user.state.clone(),
            iat: now.timestamp(),
            exp: (now.timestamp_millis() + ttl_ms) / 1000,
            server_restart_at: self.epoch_ms,
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Internal(format!("token signing failed: {err}")))
    }

    /// Verify a token and extract its claims.
    ///
    /// Checks run in order: signature and structure, then process epoch, then
    /// expiry. Structural problems, bad signatures, unsupported algorithms,
    /// and stale epochs all collapse into `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims = data.claims;

        if claims.server_restart_at < self.epoch_ms {
            return Err(AuthError::InvalidToken);
        }

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("token_ttl_ms", &self.token_ttl_ms)
            .field("epoch_ms", &self.epoch_ms)
            .finish_non_exhaustive()
    }
}
