use derive_more::Display;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::info;

use crate::config::SmtpConfig;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Display)]
#[display(fmt = "{}", _0)]
pub struct MailError(pub String);

impl std::error::Error for MailError {}

pub trait Mailer {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), MailError>;
}

/// SMTP delivery over rustls.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| MailError(format!("Invalid from address: {}", e)))?;

        let transport = if config.username.is_empty() {
            // local relay without auth
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        } else {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| MailError(format!("SMTP relay error: {}", e)))?
                .credentials(creds)
                .port(config.port)
                .build()
        };

        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), MailError> {
        let to = envelope
            .to
            .parse::<Mailbox>()
            .map_err(|e| MailError(format!("Invalid to address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(envelope.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(envelope.body.clone())
            .map_err(|e| MailError(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

/// Writes notifications to the log; used when no SMTP server is configured.
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), MailError> {
        info!(
            to = %envelope.to,
            subject = %envelope.subject,
            body = %envelope.body,
            "SMTP not configured, notification logged only"
        );
        Ok(())
    }
}

/// Mailer picked at startup.
pub enum Outbox {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl Outbox {
    pub fn from_config(smtp: Option<&SmtpConfig>) -> Result<Self, MailError> {
        match smtp {
            Some(cfg) => Ok(Outbox::Smtp(SmtpMailer::new(cfg)?)),
            None => Ok(Outbox::Log(LogMailer)),
        }
    }
}

impl Mailer for Outbox {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), MailError> {
        match self {
            Outbox::Smtp(m) => m.deliver(envelope).await,
            Outbox::Log(m) => m.deliver(envelope).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp(from: &str) -> SmtpConfig {
        SmtpConfig {
            host: "localhost".into(),
            port: 1025,
            username: String::new(),
            password: String::new(),
            from: from.into(),
        }
    }

    #[test]
    fn falls_back_to_log_without_smtp() {
        assert!(matches!(Outbox::from_config(None), Ok(Outbox::Log(_))));
    }

    #[test]
    fn rejects_bad_from_address() {
        assert!(SmtpMailer::new(&smtp("not an address")).is_err());
        assert!(SmtpMailer::new(&smtp("Leave Manager <noreply@college.edu>")).is_ok());
    }

    #[actix_web::test]
    async fn log_mailer_always_succeeds() {
        let envelope = Envelope {
            to: "a@b.c".into(),
            subject: "s".into(),
            body: "b".into(),
        };
        assert!(LogMailer.deliver(&envelope).await.is_ok());
    }
}
