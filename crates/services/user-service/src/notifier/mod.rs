//! Out-of-band password notifications.
//!
//! Delivery is best-effort: the dispatcher spawns a detached task per notice
//! and nobody awaits it. Failures end up in the log and nowhere else.

mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use common::AppResult;

pub use smtp::SmtpNotifier;

/// A plaintext password on its way to its owner.
#[derive(Clone)]
pub struct PasswordNotice {
    pub email: String,
    pub password: String,
}

impl PasswordNotice {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Mail body sent to the user.
    pub fn body(&self) -> String {
        format!("Dear customer, your current password: {}", self.password)
    }
}

impl std::fmt::Debug for PasswordNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordNotice")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Delivery channel for password notices.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notice: PasswordNotice) -> AppResult<()>;
}

/// Development notifier used when no SMTP relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notice: PasswordNotice) -> AppResult<()> {
        tracing::warn!("SMTP not configured - password notice not delivered");
        info!(to = %notice.email, "Password notice logged instead of sent");
        Ok(())
    }
}

/// Fire-and-forget front of a [`Notifier`].
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Spawn delivery and return immediately.
    pub fn dispatch(&self, notice: PasswordNotice) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let email = notice.email.clone();
            match notifier.send(notice).await {
                Ok(()) => info!(to = %email, "Password notice delivered"),
                Err(e) => error!(to = %email, error = %e, "Password notice delivery failed"),
            }
        });
    }
}
