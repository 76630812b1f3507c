//! User store.
//!
//! Persistence for registered health workers and administrators. The auth
//! subsystem reads users by email and touches their last-active timestamp.

mod models;
mod repository;

pub use models::{CreateUserRequest, User, UserListQuery};
pub use repository::UserRepository;
