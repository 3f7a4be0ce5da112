//! [`Mailer`] backed by a real SMTP server.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::contact::{Mailer, MailerFactory, OutgoingMail, SmtpSettings};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn connect(settings: &SmtpSettings) -> Result<Self> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .with_context(|| format!("invalid SMTP host: {}", settings.host))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();
        Ok(Self { transport })
    }
}

pub fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let from = Mailbox::new(
        Some(mail.from_name.clone()),
        mail.from_address
            .parse()
            .with_context(|| format!("invalid sender address: {}", mail.from_address))?,
    );
    let to: Mailbox = mail
        .to
        .parse()
        .with_context(|| format!("invalid destination address: {}", mail.to))?;

    let mut builder = Message::builder().from(from).to(to).subject(&mail.subject);
    if let Some(reply_to) = &mail.reply_to {
        match reply_to.parse::<Mailbox>() {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(e) => tracing::warn!(%reply_to, "dropping unusable reply-to: {}", e),
        }
    }
    builder
        .multipart(MultiPart::alternative_plain_html(
            mail.text.clone(),
            mail.html.clone(),
        ))
        .context("failed to build message")
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn verify(&self) -> Result<()> {
        let ok = self
            .transport
            .test_connection()
            .await
            .context("SMTP connection check failed")?;
        if !ok {
            anyhow::bail!("SMTP server rejected the connection check");
        }
        Ok(())
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = build_message(mail)?;
        let response = self
            .transport
            .send(message)
            .await
            .context("SMTP send failed")?;
        tracing::debug!(code = %response.code(), "SMTP accepted message");
        Ok(())
    }
}

/// Opens a fresh [`SmtpMailer`] for every submission.
pub struct SmtpFactory;

impl MailerFactory for SmtpFactory {
    fn connect(&self, settings: &SmtpSettings) -> Result<Box<dyn Mailer>> {
        Ok(Box::new(SmtpMailer::connect(settings)?))
    }
}
