//! The sendmail transport pipes the staged message through a local sendmail
//! binary, through lettre. The binary path comes from the `mailpath`
//! configuration option.

use std::fmt;

use lettre::Transport as _;

use crate::{
    address::Address,
    attachment::Attachment,
    config::MailerConfig,
    transport::{staging::Staging, Transport},
};

/// Delivers staged messages through a sendmail binary.
#[derive(Default)]
pub struct SendmailTransport {
    command: Option<String>,
    staging: Staging,
    transcript: Vec<String>,
}

impl SendmailTransport {
    /// Creates a transport using the platform's default sendmail command.
    pub fn new() -> SendmailTransport {
        SendmailTransport::default()
    }

    /// Creates a transport using the given sendmail command.
    pub fn new_with_command(command: impl Into<String>) -> SendmailTransport {
        SendmailTransport {
            command: Some(command.into()),
            ..SendmailTransport::default()
        }
    }

    fn deliver(&self) -> Result<(), String> {
        let message = self.staging.build_message()?;

        let sender = match &self.command {
            Some(command) => lettre::SendmailTransport::new_with_command(command),
            None => lettre::SendmailTransport::new(),
        };

        sender
            .send(&message)
            .map_err(|e| format!("sendmail delivery failed: {e}"))
    }
}

impl Transport for SendmailTransport {
    fn initialize(&mut self, config: &MailerConfig) {
        self.transcript
            .push(format!("initialized with mailpath {}", config.mailpath));
        self.command = Some(config.mailpath.clone());
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
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("message handed to sendmail for {recipients} recipient(s)");
                self.transcript
                    .push(format!("send: accepted for {recipients} recipient(s)"));
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

impl fmt::Debug for SendmailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendmailTransport")
            .field("command", &self.command)
            .finish()
    }
}
