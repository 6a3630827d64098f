use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::email_templates::RenderedEmail;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email delivery is not configured")]
    Disabled,

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Outgoing mail transport. `Disabled` is used when no SMTP host is configured;
/// every send through it fails so the attempt is still recorded.
#[derive(Clone)]
pub enum Mailer {
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
    Disabled,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Result<Self> {
        let Some(smtp) = &config.smtp else {
            tracing::warn!("SMTP_HOST is not set; outgoing email is disabled");
            return Ok(Mailer::Disabled);
        };

        let address: Address = config
            .email_from
            .parse()
            .map_err(|e| Error::Config(format!("Invalid EMAIL_FROM: {}", e)))?;
        let from = Mailbox::new(Some(config.email_from_name.clone()), address);

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| Error::Config(format!("Invalid SMTP_HOST: {}", e)))?
            .port(smtp.port);
        if let (Some(user), Some(pass)) = (&smtp.user, &smtp.pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        tracing::info!(host = %smtp.host, port = smtp.port, "SMTP mailer configured");
        Ok(Mailer::Smtp {
            transport: builder.build(),
            from,
        })
    }

    /// Sends one message to all recipients and returns its Message-ID.
    pub async fn send(
        &self,
        recipients: &[String],
        email: &RenderedEmail,
    ) -> std::result::Result<String, MailError> {
        let Mailer::Smtp { transport, from } = self else {
            return Err(MailError::Disabled);
        };

        let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());
        let mut builder = Message::builder()
            .from(from.clone())
            .subject(email.subject.clone())
            .message_id(Some(message_id.clone()));
        for recipient in recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }
        let message = builder.multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))?;

        transport.send(message).await?;
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RenderedEmail {
        RenderedEmail {
            subject: "Hello".into(),
            html: "<p>Hi</p>".into(),
            text: "Hi".into(),
        }
    }

    #[test]
    fn disabled_mailer_always_fails() {
        let err = tokio_test::block_on(Mailer::Disabled.send(&["a@b.com".to_string()], &sample()))
            .unwrap_err();
        assert_eq!(err.to_string(), "email delivery is not configured");
    }
}
