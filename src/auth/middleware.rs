//! Per-request authentication middleware.
//!
//! Runs before route dispatch on every request. A missing or unusable bearer
//! token never aborts the request; it simply proceeds unauthenticated and
//! routes that need a user reject it through the [`CurrentUser`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use super::service::AuthService;
use crate::api::ApiError;
use crate::user::User;

/// Authenticated request context.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The resolved account, re-fetched from the store at request time.
    pub user: User,
    /// Role-derived authority label, e.g. `ROLE_ADMIN`.
    pub authority: String,
}

/// Attach an [`AuthContext`] extension when the request carries a valid
/// bearer token for an existing user.
///
/// Never overwrites a context attached earlier in the chain, and never
/// surfaces why authentication failed.
pub async fn auth_middleware(
    State(auth): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<AuthContext>().is_none()
        && let Some(token) = bearer_token(request.headers())
        && let Some(context) = build_context(&auth, token).await
    {
        request.extensions_mut().insert(context);
    }

    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn build_context(auth: &AuthService, token: &str) -> Option<AuthContext> {
    let claims = match auth.tokens().verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            debug!("Request token rejected: {err}");
            return None;
        }
    };

    // Claims are not assumed durable across store changes; the subject must
    // still exist.
    match auth.users().get_by_email(&claims.sub).await {
        Ok(Some(user)) => Some(AuthContext {
            authority: format!("ROLE_{}", user.role),
            user,
        }),
        Ok(None) => {
            debug!(subject = %claims.sub, "Token subject no longer exists");
            None
        }
        Err(err) => {
            warn!("User lookup during authentication failed: {err:#}");
            None
        }
    }
}

/// Extractor for handlers that require an authenticated user.
///
/// Rejects with 401 when the middleware did not attach a context.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers), None);
    }
}
