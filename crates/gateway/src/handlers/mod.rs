//! HTTP request handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use health_handler::health_routes;
pub use user_handler::user_routes;

use std::borrow::Cow;

use domain::PasswordPolicy;
use validator::ValidationError;

/// Field check delegating to the password policy. Empty means "generate one".
pub(crate) fn validate_password(value: &str) -> Result<(), ValidationError> {
    PasswordPolicy::validate(value).map_err(|e| {
        let mut error = ValidationError::new("password_policy");
        error.message = Some(Cow::Owned(e.to_string()));
        error
    })
}
