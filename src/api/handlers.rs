//! API request handlers.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;

use crate::auth::{CurrentUser, LoginRequest, Role, SessionResponse, bearer_token};

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Authenticate with email, secret, and role category.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.auth.login(request).await?;
    Ok(Json(session))
}

/// Validate the bearer token and return the account summary.
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionResponse>> {
    let token = require_bearer(&headers)?;
    let session = state.auth.validate(token).await?;
    Ok(Json(session))
}

/// Exchange a currently-valid bearer token for a fresh one.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionResponse>> {
    let token = require_bearer(&headers)?;
    let session = state.auth.refresh(token).await?;
    Ok(Json(session))
}

/// Record a logout. Always succeeds; tokens are stateless.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    if let Some(token) = bearer_token(&headers) {
        state.auth.logout(token).await;
    }
    Json(serde_json::json!({ "status": "logged_out" }))
}

/// Profile of the authenticated user.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub designation: &'static str,
    pub district: String,
    pub state: String,
    pub authority: String,
    pub permissions: &'static [&'static str],
}

/// Get the authenticated user's profile.
pub async fn get_me(CurrentUser(context): CurrentUser) -> Json<MeResponse> {
    let user = context.user;
    Json(MeResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        designation: user.role.designation(),
        district: user.district,
        state: user.state,
        authority: context.authority,
        permissions: user.role.permissions(),
    })
}

fn require_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    bearer_token(headers).ok_or_else(|| ApiError::bad_request("Missing bearer token"))
}
