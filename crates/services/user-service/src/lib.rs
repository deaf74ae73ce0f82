//! User Service Library
//!
//! The authentication core: access control, the credential lifecycle and
//! the adapters it talks to (PostgreSQL directory, identity authority,
//! password notifier). The HTTP gateway embeds it.

pub mod client;
pub mod config;
pub mod infra;
pub mod notifier;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::AppResult;
use domain::CredentialHasher;

use crate::client::{GrpcIdentityClient, IdentityAuthority};
use crate::config::UserServiceConfig;
use crate::infra::{Database, HealthCheck};
use crate::notifier::{LogNotifier, NotificationDispatcher, Notifier, SmtpNotifier};
use crate::repository::UserStore;
use crate::service::{AccessControl, UserLifecycle, UserManager};

/// Wired components handed to the HTTP layer.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserLifecycle>,
    pub access: Arc<AccessControl>,
    pub health: Arc<dyn HealthCheck>,
}

/// Connect the database, apply migrations and assemble the core.
pub async fn bootstrap(config: &UserServiceConfig) -> Result<Services, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;

    let authority: Arc<dyn IdentityAuthority> = Arc::new(GrpcIdentityClient::new(&config.identity)?);
    let access = Arc::new(AccessControl::new(Arc::clone(&authority)));
    let notifier = build_notifier(config)?;

    let users = Arc::new(UserManager::new(
        Arc::new(UserStore::new(db.get_connection())),
        authority,
        Arc::clone(&access),
        CredentialHasher::new(config.hash_cost),
        NotificationDispatcher::new(notifier),
    ));

    info!(
        identity = %config.identity.endpoint,
        hash_cost = config.hash_cost,
        "User service initialized"
    );

    Ok(Services {
        users,
        access,
        health: Arc::new(db),
    })
}

fn build_notifier(config: &UserServiceConfig) -> AppResult<Arc<dyn Notifier>> {
    match &config.smtp {
        Some(smtp) => {
            info!(host = %smtp.host, port = smtp.port, "SMTP notifier configured");
            Ok(Arc::new(SmtpNotifier::new(smtp)?))
        }
        None => Ok(Arc::new(LogNotifier)),
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
