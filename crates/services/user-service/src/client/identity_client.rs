//! gRPC client for the identity authority.

use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, warn};

use common::{AppError, AppResult, GrpcClientConfig};
use domain::{ResolvedIdentity, TokenPair};
use proto::auth::{AccessToken, User};
use proto::AuthClient;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Token issuer and role registry.
///
/// Every failure is classified here: token resolution failures become
/// `Unauthenticated`, everything else `Upstream`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityAuthority: Send + Sync {
    /// Resolve a bare access token to the caller identity
    async fn resolve_token(&self, token: &str) -> AppResult<ResolvedIdentity>;

    async fn bind_role(&self, user_id: i32, role: &str) -> AppResult<()>;

    async fn issue_tokens(&self, user_id: i32, role: &str) -> AppResult<TokenPair>;

    /// Refresh-token exchange. Not offered by this service.
    async fn refresh_tokens(&self, refresh_token: &str) -> AppResult<TokenPair>;

    /// Role names known to the authority
    async fn list_roles(&self) -> AppResult<Vec<String>>;
}

/// Tonic client wrapper for the identity authority.
#[derive(Clone)]
pub struct GrpcIdentityClient {
    client: AuthClient<Channel>,
}

impl GrpcIdentityClient {
    /// Build a lazily connected client; the first call opens the channel.
    pub fn new(config: &GrpcClientConfig) -> AppResult<Self> {
        debug!("Configuring identity authority client for {}", config.endpoint);
        let channel = Endpoint::from_shared(config.endpoint.clone())
            .map_err(|e| AppError::internal(format!("invalid identity endpoint: {}", e)))?
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_lazy();

        Ok(Self {
            client: AuthClient::new(channel),
        })
    }
}

fn upstream(context: &str, status: tonic::Status) -> AppError {
    warn!(code = ?status.code(), "{} failed: {}", context, status.message());
    AppError::upstream(format!("{}: {}", context, status.message()))
}

#[async_trait]
impl IdentityAuthority for GrpcIdentityClient {
    async fn resolve_token(&self, token: &str) -> AppResult<ResolvedIdentity> {
        let request = tonic::Request::new(AccessToken {
            access_token: token.to_string(),
        });

        let mut client = self.client.clone();
        let response = client
            .get_user_with_rights(request)
            .await
            .map_err(|status| AppError::unauthenticated(status.message().to_string()))?;
        let proto = response.into_inner();

        Ok(ResolvedIdentity {
            user_id: proto.user_id,
            role: proto.role,
            permissions: proto.permissions,
        })
    }

    async fn bind_role(&self, user_id: i32, role: &str) -> AppResult<()> {
        let request = tonic::Request::new(User {
            user_id,
            role: role.to_string(),
        });

        let mut client = self.client.clone();
        let response = client
            .bind_user_and_role(request)
            .await
            .map_err(|status| upstream("role binding", status))?;

        if !response.into_inner().result_binding {
            return Err(AppError::upstream(format!(
                "role binding rejected for user {}",
                user_id
            )));
        }

        Ok(())
    }

    async fn issue_tokens(&self, user_id: i32, role: &str) -> AppResult<TokenPair> {
        let request = tonic::Request::new(User {
            user_id,
            role: role.to_string(),
        });

        let mut client = self.client.clone();
        let response = client
            .token_generation_by_user_id(request)
            .await
            .map_err(|status| upstream("token issuance", status))?;
        let proto = response.into_inner();

        Ok(TokenPair {
            access_token: proto.access_token,
            refresh_token: proto.refresh_token,
        })
    }

    async fn refresh_tokens(&self, _refresh_token: &str) -> AppResult<TokenPair> {
        Err(AppError::Unsupported("token refresh"))
    }

    async fn list_roles(&self) -> AppResult<Vec<String>> {
        let mut client = self.client.clone();
        let response = client
            .get_all_roles(tonic::Request::new(()))
            .await
            .map_err(|status| upstream("role listing", status))?;

        Ok(split_roles(&response.into_inner().roles))
    }
}

/// Split the comma-joined role catalogue into trimmed names.
pub(crate) fn split_roles(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_roles_trims_and_skips_empty() {
        assert_eq!(
            split_roles("Superadmin, Courier,,Courier manager "),
            vec!["Superadmin", "Courier", "Courier manager"]
        );
        assert!(split_roles("").is_empty());
    }

    #[tokio::test]
    async fn test_refresh_is_unsupported() {
        let client = GrpcIdentityClient::new(&GrpcClientConfig::default()).unwrap();
        let err = client.refresh_tokens("refresh").await.unwrap_err();
        assert!(matches!(err, AppError::Unsupported(_)));
    }
}
