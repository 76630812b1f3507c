//! Authentication failure taxonomy.

use thiserror::Error;

/// Failures surfaced by the authentication subsystem.
///
/// Token verification deliberately collapses malformed structure, bad
/// signatures, unsupported algorithms, and stale-epoch tokens into the single
/// `InvalidToken` variant so callers cannot tell which sub-check failed; only
/// expiry is reported separately.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account exists for the supplied email.
    #[error("no account found for email {0}")]
    CredentialNotFound(String),

    /// The supplied secret did not match the stored value.
    #[error("invalid credentials")]
    InvalidCredential,

    /// The account's role bucket does not match the requested login category.
    #[error("role mismatch: account is {actual} but login was requested as {requested}")]
    RoleMismatch {
        actual: crate::auth::RoleCategory,
        requested: crate::auth::RoleCategory,
    },

    /// Token failed signature, structure, or epoch validation.
    #[error("invalid token")]
    InvalidToken,

    /// Token signature and epoch were valid but the token has expired.
    #[error("token has expired")]
    ExpiredToken,

    /// Store or signing failure unrelated to the caller's input.
    #[error("authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable category for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::CredentialNotFound(_) => "CREDENTIAL_NOT_FOUND",
            AuthError::InvalidCredential => "INVALID_CREDENTIAL",
            AuthError::RoleMismatch { .. } => "ROLE_MISMATCH",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::ExpiredToken => "EXPIRED_TOKEN",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Internal(err.to_string())
    }
}
