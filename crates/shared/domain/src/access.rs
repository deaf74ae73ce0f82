//! Endpoint access requirements.

use crate::constants::{
    ROLE_COURIER, ROLE_COURIER_MANAGER, ROLE_CUSTOMER, ROLE_RESTAURANT_MANAGER, ROLE_SUPERADMIN,
};

/// Roles and permissions a caller needs to reach an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointPolicy {
    pub roles: &'static [&'static str],
    pub permissions: &'static [&'static str],
}

impl EndpointPolicy {
    pub const fn roles(roles: &'static [&'static str]) -> Self {
        Self {
            roles,
            permissions: &[],
        }
    }
}

/// `GET /users/:id`
pub const GET_USER: EndpointPolicy = EndpointPolicy::roles(&[ROLE_SUPERADMIN]);

/// `GET /users/`
pub const LIST_USERS: EndpointPolicy = EndpointPolicy::roles(&[ROLE_SUPERADMIN]);

/// `POST /users/staff`
pub const CREATE_STAFF: EndpointPolicy =
    EndpointPolicy::roles(&[ROLE_SUPERADMIN, ROLE_COURIER_MANAGER]);

/// `DELETE /users/:id`
pub const DELETE_USER: EndpointPolicy =
    EndpointPolicy::roles(&[ROLE_SUPERADMIN, ROLE_COURIER_MANAGER]);

/// `PUT /users/`
pub const UPDATE_USER: EndpointPolicy = EndpointPolicy::roles(&[
    ROLE_SUPERADMIN,
    ROLE_CUSTOMER,
    ROLE_COURIER,
    ROLE_COURIER_MANAGER,
    ROLE_RESTAURANT_MANAGER,
]);
