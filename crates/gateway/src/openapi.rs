//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{CustomerRequest, LoginRequest, RestorePasswordRequest};
use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use crate::handlers::user_handler::{IdResponse, StaffRequest, UpdateUserRequest, UsersResponse};
use domain::{ResponseUser, TokenPair};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::create_customer,
        crate::handlers::auth_handler::restore_password,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::create_staff,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::delete_user,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            LoginRequest,
            CustomerRequest,
            RestorePasswordRequest,
            StaffRequest,
            UpdateUserRequest,
            TokenPair,
            ResponseUser,
            UsersResponse,
            IdResponse,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, registration and password restore"),
        (name = "Users", description = "User management endpoints"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}
