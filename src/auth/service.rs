//! Authentication service: login, token validation, refresh, and logout.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::error::AuthError;
use super::roles::{Role, RoleCategory};
use super::token::TokenService;
use crate::user::{User, UserRepository};

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "roleCategory")]
    pub role_category: RoleCategory,
}

/// Summary returned by login, validate, and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub designation: &'static str,
    pub district: String,
    pub permissions: &'static [&'static str],
}

impl SessionResponse {
    fn for_user(token: String, user: &User) -> Self {
        Self {
            token,
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            designation: user.role.designation(),
            district: user.district.clone(),
            permissions: user.role.permissions(),
        }
    }
}

/// Service for authentication operations.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserRepository,
    tokens: Arc<TokenService>,
}

impl AuthService {
    /// Create a new authentication service.
    pub fn new(users: UserRepository, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// The token service used for issuance and verification.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// The backing user store.
    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    /// Authenticate a login attempt and issue a token.
    ///
    /// Checks run in order: account lookup, verbatim secret comparison
    /// against the registered phone number, then role-bucket compatibility
    /// with the category the client selected at the login screen.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<SessionResponse, AuthError> {
        let user = self
            .users
            .get_by_email(&request.email)
            .await
            .map_err(AuthError::from)?
            .ok_or_else(|| AuthError::CredentialNotFound(request.email.clone()))?;

        if user.phone != request.password {
            return Err(AuthError::InvalidCredential);
        }

        let actual = user.role.category();
        if actual != request.role_category {
            return Err(AuthError::RoleMismatch {
                actual,
                requested: request.role_category,
            });
        }

        self.users.touch_last_active(&user.id).await?;
        let token = self.tokens.issue(&user)?;

        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(SessionResponse::for_user(token, &user))
    }

    /// Validate a bearer token and return the account summary it belongs to.
    #[instrument(skip(self, token))]
    pub async fn validate(&self, token: &str) -> Result<SessionResponse, AuthError> {
        let claims = self.tokens.verify(token)?;
        let user = self.lookup_subject(&claims.sub).await?;

        self.users.touch_last_active(&user.id).await?;
        Ok(SessionResponse::for_user(token.to_string(), &user))
    }

    /// Exchange a currently-valid token for a newly signed one with a fresh
    /// expiry. The claim shape is identical; only the timestamps move.
    #[instrument(skip(self, token))]
    pub async fn refresh(&self, token: &str) -> Result<SessionResponse, AuthError> {
        let claims = self.tokens.verify(token)?;
        let user = self.lookup_subject(&claims.sub).await?;

        let fresh = self.tokens.issue(&user)?;
        self.users.touch_last_active(&user.id).await?;

        debug!(user_id = %user.id, "Token refreshed");
        Ok(SessionResponse::for_user(fresh, &user))
    }

    /// Record a logout. Tokens are stateless, so this only touches the
    /// last-active timestamp; every failure is swallowed.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) {
        let Ok(claims) = self.tokens.verify(token) else {
            return;
        };

        match self.users.get_by_email(&claims.sub).await {
            Ok(Some(user)) => {
                if let Err(err) = self.users.touch_last_active(&user.id).await {
                    warn!(user_id = %user.id, "Failed to record logout: {err:#}");
                }
            }
            Ok(None) => {}
            Err(err) => warn!("Logout lookup failed: {err:#}"),
        }
    }

    async fn lookup_subject(&self, email: &str) -> Result<User, AuthError> {
        self.users
            .get_by_email(email)
            .await
            .map_err(AuthError::from)?
            .ok_or_else(|| AuthError::CredentialNotFound(email.to_string()))
    }
}
