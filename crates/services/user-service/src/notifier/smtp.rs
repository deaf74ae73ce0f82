//! SMTP notifier using lettre.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use common::{AppError, AppResult, SmtpConfig};

use super::{Notifier, PasswordNotice};

const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends password notices through an SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    subject: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| AppError::internal(format!("invalid sender address: {}", e)))?;

        // 465 speaks TLS from the first byte, anything else upgrades with STARTTLS
        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| AppError::internal(format!("failed to create SMTP relay: {}", e)))?
        .port(config.port);

        let builder = if config.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
        };

        Ok(Self {
            transport: builder.build(),
            from,
            subject: config.subject.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notice: PasswordNotice) -> AppResult<()> {
        let to: Mailbox = notice
            .email
            .parse()
            .map_err(|e| AppError::validation(format!("invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body())
            .map_err(|e| AppError::internal(format!("failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::internal(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}
