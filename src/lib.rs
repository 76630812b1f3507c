//! HealthNet Backend Library
//!
//! Core components for the HealthNet community health reporting backend:
//! stateless JWT authentication with a process-lifetime invalidation epoch,
//! the user store, and the HTTP API surface.

pub mod api;
pub mod auth;
pub mod db;
pub mod user;
