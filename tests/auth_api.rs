//! End-to-end tests for the authentication HTTP surface.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum_test::TestServer;
use serde_json::{Value, json};

use healthnet_backend::api::{AppState, create_router};
use healthnet_backend::auth::{
    AuthContext, AuthService, DEFAULT_TOKEN_TTL_MS, Role, TokenService,
};
use healthnet_backend::db::Database;
use healthnet_backend::user::{CreateUserRequest, UserRepository};

const SECRET: &str = "integration-test-secret";

async fn seeded_repository() -> UserRepository {
    let db = Database::in_memory().await.unwrap();
    let users = UserRepository::new(db.pool().clone());

    users
        .create(CreateUserRequest {
            name: "Anil Deka".to_string(),
            email: "a@x.com".to_string(),
            phone: "9876543210".to_string(),
            role: Role::Admin,
            district: "Kamrup".to_string(),
            state: "Assam".to_string(),
        })
        .await
        .unwrap();
    users
        .create(CreateUserRequest {
            name: "Rina Das".to_string(),
            email: "rina@healthnet.gov.in".to_string(),
            phone: "9123456780".to_string(),
            role: Role::AshaWorker,
            district: "Dibrugarh".to_string(),
            state: "Assam".to_string(),
        })
        .await
        .unwrap();

    users
}

async fn test_server_at_epoch(epoch_ms: i64) -> TestServer {
    let users = seeded_repository().await;
    let tokens = Arc::new(TokenService::new(SECRET, DEFAULT_TOKEN_TTL_MS, epoch_ms));
    let state = AppState::new(AuthService::new(users, tokens));
    TestServer::new(create_router(state, &[])).unwrap()
}

fn admin_login_body() -> Value {
    json!({
        "email": "a@x.com",
        "password": "9876543210",
        "roleCategory": "admin",
    })
}

async fn login_admin(server: &TestServer) -> String {
    let response = server.post("/api/auth/login").json(&admin_login_body()).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let server = test_server_at_epoch(1_000).await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_login_success() {
    let server = test_server_at_epoch(1_000).await;

    let response = server.post("/api/auth/login").json(&admin_login_body()).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["role"], "ADMIN");
    assert_eq!(body["designation"], "Government Official");
    assert_eq!(body["district"], "Kamrup");
    let permissions: Vec<String> = body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect();
    assert!(permissions.contains(&"manage_users".to_string()));
}

#[tokio::test]
async fn test_login_role_mismatch() {
    let server = test_server_at_epoch(1_000).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "a@x.com",
            "password": "9876543210",
            "roleCategory": "staff",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "ROLE_MISMATCH");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = test_server_at_epoch(1_000).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "a@x.com",
            "password": "0000000000",
            "roleCategory": "admin",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let server = test_server_at_epoch(1_000).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "nobody@x.com",
            "password": "1",
            "roleCategory": "staff",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "CREDENTIAL_NOT_FOUND");
}

#[tokio::test]
async fn test_validate_round_trip() {
    let server = test_server_at_epoch(1_000).await;
    let token = login_admin(&server).await;

    let response = server
        .post("/api/auth/validate")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["token"], token.as_str());
}

#[tokio::test]
async fn test_validate_rejects_garbage() {
    let server = test_server_at_epoch(1_000).await;

    let response = server
        .post("/api/auth/validate")
        .authorization_bearer("not.a.token")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_validate_requires_token() {
    let server = test_server_at_epoch(1_000).await;

    let response = server.post("/api/auth/validate").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_returns_working_token() {
    let server = test_server_at_epoch(1_000).await;
    let token = login_admin(&server).await;

    let response = server
        .post("/api/auth/refresh")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let refreshed = response.json::<Value>()["token"].as_str().unwrap().to_string();

    let me = server
        .get("/api/users/me")
        .authorization_bearer(&refreshed)
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);
    assert_eq!(me.json::<Value>()["email"], "a@x.com");
}

#[tokio::test]
async fn test_me_requires_authentication() {
    let server = test_server_at_epoch(1_000).await;

    // No token: the request reaches the route unauthenticated and the
    // extractor rejects it.
    let response = server.get("/api/users/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_with_tampered_token_is_unauthenticated() {
    let server = test_server_at_epoch(1_000).await;
    let token = login_admin(&server).await;

    let mut tampered = token.clone();
    tampered.pop();
    tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

    // The middleware swallows the failure; the route just sees no context.
    let response = server
        .get("/api/users/me")
        .authorization_bearer(&tampered)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_with_valid_token() {
    let server = test_server_at_epoch(1_000).await;
    let token = login_admin(&server).await;

    let response = server
        .get("/api/users/me")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["authority"], "ROLE_ADMIN");
    assert_eq!(body["designation"], "Government Official");
}

#[tokio::test]
async fn test_restart_invalidates_token() {
    let server = test_server_at_epoch(1_000).await;
    let token = login_admin(&server).await;

    // A second server with the same secret and user data but a later epoch
    // stands in for the restarted process.
    let restarted = test_server_at_epoch(2_000).await;

    let response = restarted
        .post("/api/auth/validate")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "INVALID_TOKEN");

    // And the middleware path degrades to unauthenticated.
    let me = restarted
        .get("/api/users/me")
        .authorization_bearer(&token)
        .await;
    assert_eq!(me.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(me.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_attached_context_is_not_overwritten() {
    let users = seeded_repository().await;
    let tokens = Arc::new(TokenService::new(SECRET, DEFAULT_TOKEN_TTL_MS, 1_000));
    let state = AppState::new(AuthService::new(users.clone(), tokens));

    // An upstream layer has already attached a context for the staff user.
    let staff = users
        .get_by_email("rina@healthnet.gov.in")
        .await
        .unwrap()
        .unwrap();
    let attached = AuthContext {
        authority: format!("ROLE_{}", staff.role),
        user: staff,
    };
    let app = create_router(state, &[]).layer(middleware::from_fn(
        move |mut request: Request, next: Next| {
            let attached = attached.clone();
            async move {
                request.extensions_mut().insert(attached);
                next.run(request).await
            }
        },
    ));
    let server = TestServer::new(app).unwrap();

    // A bearer token for the admin user must not displace it.
    let token = login_admin(&server).await;
    let response = server
        .get("/api/users/me")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["email"], "rina@healthnet.gov.in");
    assert_eq!(body["authority"], "ROLE_ASHA_WORKER");
}

#[tokio::test]
async fn test_logout_always_succeeds() {
    let server = test_server_at_epoch(1_000).await;

    let response = server
        .post("/api/auth/logout")
        .authorization_bearer("garbage")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let token = login_admin(&server).await;
    let response = server
        .post("/api/auth/logout")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "logged_out");
}
