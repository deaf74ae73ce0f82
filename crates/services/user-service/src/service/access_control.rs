//! Authorization gate for protected endpoints.
//!
//! A request moves Unauthenticated -> Authenticated (token resolved) ->
//! Authorized or rejected (role and permission check). Any failure is final.

use std::sync::Arc;

use tracing::debug;

use common::{AppError, AppResult};
use domain::{EndpointPolicy, ResolvedIdentity, BEARER_SCHEME};

use crate::client::IdentityAuthority;

/// Resolves bearer tokens and checks them against endpoint requirements.
pub struct AccessControl {
    authority: Arc<dyn IdentityAuthority>,
}

impl AccessControl {
    pub fn new(authority: Arc<dyn IdentityAuthority>) -> Self {
        Self { authority }
    }

    /// Resolve an `Authorization` header value of the form `Bearer <token>`.
    pub async fn resolve_token(&self, header: &str) -> AppResult<ResolvedIdentity> {
        if header.is_empty() {
            return Err(AppError::unauthenticated("empty auth header"));
        }

        let parts: Vec<&str> = header.split(' ').collect();
        if parts.len() != 2 || parts[0] != BEARER_SCHEME {
            return Err(AppError::unauthenticated("invalid auth header"));
        }

        let token = parts[1];
        if token.is_empty() {
            return Err(AppError::unauthenticated("token is empty"));
        }

        let identity = self.authority.resolve_token(token).await?;
        debug!(user_id = identity.user_id, role = %identity.role, "Token resolved");
        Ok(identity)
    }

    /// `actual` must be exactly one of `allowed`.
    pub fn check_role(allowed: &[&str], actual: &str) -> AppResult<()> {
        if allowed.iter().any(|role| *role == actual) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Every required permission must be among the comma-separated `granted` names.
    pub fn check_permissions(required: &[&str], granted: &str) -> AppResult<()> {
        let granted: Vec<&str> = granted.split(',').map(str::trim).collect();

        if required.iter().all(|perm| granted.contains(perm)) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Role then permissions.
    pub fn authorize(identity: &ResolvedIdentity, policy: &EndpointPolicy) -> AppResult<()> {
        Self::check_role(policy.roles, &identity.role)?;
        Self::check_permissions(policy.permissions, &identity.permissions)
    }

    /// A role supplied in a request must be registered with the authority.
    pub async fn check_input_role(&self, candidate: &str) -> AppResult<()> {
        let roles = self.authority.list_roles().await?;

        if roles.iter().any(|role| role == candidate) {
            Ok(())
        } else {
            Err(AppError::InvalidRole(candidate.to_string()))
        }
    }
}
