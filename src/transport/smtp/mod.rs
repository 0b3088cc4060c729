//! The SMTP transport delivers the staged message through lettre's SMTP
//! client. Connection settings come from the `smtp_*` configuration options;
//! every send is a one-shot delivery attempt with no connection reuse.

use std::fmt;

use lettre::{
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Transport as _,
};

use crate::{
    address::Address,
    attachment::Attachment,
    config::{MailerConfig, SmtpCrypto},
    transport::{staging::Staging, Transport},
};

/// Delivers staged messages over SMTP.
///
/// Delivery problems (unreachable server, rejected message, unreadable
/// attachment) are reported as a `false` send outcome and recorded in the
/// transcript; they are never raised to the caller.
#[derive(Default)]
pub struct SmtpTransport {
    config: Option<MailerConfig>,
    staging: Staging,
    transcript: Vec<String>,
}

impl SmtpTransport {
    /// Creates a transport ready to deliver with the given configuration.
    pub fn new(config: MailerConfig) -> SmtpTransport {
        SmtpTransport {
            config: Some(config),
            ..SmtpTransport::default()
        }
    }

    fn deliver(&self) -> Result<String, String> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| "transport is not initialized".to_string())?;
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| "smtp_host is not configured".to_string())?;

        let message = self.staging.build_message()?;

        let mut builder = lettre::SmtpTransport::builder_dangerous(host)
            .port(config.smtp_port)
            .timeout(Some(config.smtp_timeout));

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        match config.smtp_crypto {
            Some(SmtpCrypto::Tls) => {
                let parameters = TlsParameters::new(host.to_string())
                    .map_err(|e| format!("tls setup failed: {e}"))?;
                builder = builder.tls(Tls::Required(parameters));
            }
            Some(SmtpCrypto::Ssl) => {
                let parameters = TlsParameters::new(host.to_string())
                    .map_err(|e| format!("tls setup failed: {e}"))?;
                builder = builder.tls(Tls::Wrapper(parameters));
            }
            None => {}
        }

        let response = builder
            .build()
            .send(&message)
            .map_err(|e| format!("smtp delivery failed: {e}"))?;

        Ok(response.code().to_string())
    }
}

impl Transport for SmtpTransport {
    fn initialize(&mut self, config: &MailerConfig) {
        self.transcript.push(format!(
            "initialized for {}:{}",
            config.smtp_host.as_deref().unwrap_or("unset"),
            config.smtp_port
        ));
        self.config = Some(config.clone());
    }

    fn set_from(&mut self, email: &str, name: &str) {
        self.staging.set_from(email, name);
    }

    fn set_to(&mut self, recipients: &[Address]) {
        self.staging.set_to(recipients);
    }

    fn set_cc(&mut self, recipients: &[Address]) {
        self.staging.set_cc(recipients);
    }

    fn set_bcc(&mut self, recipients: &[Address]) {
        self.staging.set_bcc(recipients);
    }

    fn set_subject(&mut self, subject: &str) {
        self.staging.set_subject(subject);
    }

    fn set_message(&mut self, message: &str) {
        self.staging.set_message(message);
    }

    fn set_alt_message(&mut self, message: &str) {
        self.staging.set_alt_message(message);
    }

    fn add_attachment(&mut self, attachment: &Attachment) {
        self.staging.add_attachment(attachment);
    }

    fn clear(&mut self, clear_attachments: bool) {
        self.staging.clear(clear_attachments);
    }

    fn send(&mut self, auto_clear: bool) -> bool {
        let recipients = self.staging.recipient_count();
        let outcome = self.deliver();
        let sent = outcome.is_ok();

        match outcome {
            Ok(code) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("message accepted for {recipients} recipient(s): {code}");
                self.transcript
                    .push(format!("send: accepted for {recipients} recipient(s) ({code})"));
            }
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("delivery failed: {reason}");
                self.transcript.push(format!("send: {reason}"));
            }
        }

        if auto_clear {
            self.staging.clear(true);
        }
        sent
    }

    fn transcript(&self) -> String {
        self.transcript.join("\n")
    }
}

// Debug by hand: the configuration holds credentials.
impl fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpTransport")
            .field(
                "host",
                &self
                    .config
                    .as_ref()
                    .and_then(|config| config.smtp_host.as_deref()),
            )
            .field("port", &self.config.as_ref().map(|config| config.smtp_port))
            .finish()
    }
}
