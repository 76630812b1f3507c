//! Authentication module.
//!
//! Stateless JWT authentication with a process-lifetime invalidation epoch:
//! - credential validation and token issuance at login
//! - token verification (signature, epoch, expiry — in that order)
//! - per-request middleware attaching an authentication context
//! - the fixed role → designation/permission table

mod claims;
mod error;
mod middleware;
mod roles;
mod service;
mod token;

pub use claims::Claims;
pub use error::AuthError;
pub use middleware::{AuthContext, CurrentUser, auth_middleware, bearer_token};
pub use roles::{Role, RoleCategory};
pub use service::{AuthService, LoginRequest, SessionResponse};
pub use token::{DEFAULT_TOKEN_TTL_MS, TokenService};
