//! Middleware for authentication.

mod auth;

pub use auth::auth_middleware;
