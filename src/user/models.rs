//! User data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::Role;

/// A registered health worker or administrator.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Registered phone number; doubles as the login secret.
    #[serde(skip_serializing)]
    pub phone: String,
    pub role: Role,
    pub district: String,
    pub state: String,
    pub join_date: String,
    pub last_active: Option<String>,
}

/// Request to register a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub district: String,
    pub state: String,
}

/// Paging and filter options for listing users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub district: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
