//! Outbound email delivery
//!
//! Delivery is best-effort from the caller's perspective. The stored invite
//! row is the source of truth; a failed or skipped send never rolls back the
//! operation that requested it.

use anyhow::{Context, Result};
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::EmailConfig;
use crate::models::Invite;

#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    invite_base_url: String,
}

impl Mailer {
    /// Build a mailer from configuration
    ///
    /// When email is disabled no transport is constructed and sends are
    /// logged instead.
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let from: Mailbox = config
            .from_address
            .parse()
            .context("Invalid from address")?;

        let transport = if config.enabled {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .context("Failed to configure SMTP relay")?
                    .port(config.smtp_port);

            if !config.smtp_username.is_empty() {
                builder = builder.credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ));
            }

            Some(builder.build())
        } else {
            None
        };

        Ok(Self {
            transport,
            from,
            invite_base_url: config.invite_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send an invitation notification
    pub async fn send_invite(&self, invite: &Invite, organization_name: &str) -> Result<()> {
        let accept_url = format!("{}/invites/{}", self.invite_base_url, invite.id);

        let Some(transport) = &self.transport else {
            info!(
                email = %invite.email,
                organization = %organization_name,
                %accept_url,
                "Email disabled, invitation logged but not sent"
            );
            return Ok(());
        };

        let to: Mailbox = invite
            .email
            .parse()
            .context("Invalid recipient address")?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!("You have been invited to {}", organization_name))
            .body(format!(
                "You have been invited to join {} as {}.\n\n\
                 Accept before {} at {}\n",
                organization_name,
                invite.role,
                invite.expires_at.format("%Y-%m-%d"),
                accept_url
            ))
            .context("Failed to build invitation email")?;

        transport
            .send(email)
            .await
            .context("Failed to send invitation email")?;

        Ok(())
    }
}
