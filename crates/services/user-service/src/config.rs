//! User service configuration.

use common::{config::parse_var, DatabaseConfig, GrpcClientConfig, SmtpConfig};
use domain::DEFAULT_HASH_COST;

/// Configuration of the authentication core.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Relational store
    pub database: DatabaseConfig,
    /// Identity authority gRPC endpoint
    pub identity: GrpcClientConfig,
    /// Work factor handed to the credential hasher
    pub hash_cost: u32,
    /// Mail relay; `None` falls back to logging notices
    pub smtp: Option<SmtpConfig>,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            identity: GrpcClientConfig::from_env(),
            hash_cost: parse_var("PASSWORD_HASH_COST")
                .filter(|cost| *cost > 0)
                .unwrap_or(DEFAULT_HASH_COST),
            smtp: SmtpConfig::from_env(),
        }
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            identity: GrpcClientConfig::default(),
            hash_cost: DEFAULT_HASH_COST,
            smtp: None,
        }
    }
}
