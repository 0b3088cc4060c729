//! The stub transport records every staged field and reports a canned
//! outcome. It can be useful for testing purposes.

use crate::{
    address::Address,
    attachment::Attachment,
    config::MailerConfig,
    transport::Transport,
};

/// A snapshot of the staged message at the moment of a delivery attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delivery {
    /// Sender address and display name, when one was staged.
    pub from: Option<(String, String)>,
    /// Destination addresses.
    pub to: Vec<String>,
    /// Carbon-copy addresses.
    pub cc: Vec<String>,
    /// Blind-carbon-copy addresses.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// Alternative body, when one was staged.
    pub alt_message: Option<String>,
    /// Attachments in staging order.
    pub attachments: Vec<Attachment>,
}

impl Delivery {
    fn clear(&mut self, clear_attachments: bool) {
        let attachments = std::mem::take(&mut self.attachments);
        *self = Delivery::default();
        if !clear_attachments {
            self.attachments = attachments;
        }
    }
}

/// This transport records staged fields and returns the given response.
///
/// Every call to [`send`](Transport::send) snapshots the staged message into
/// [`messages`](StubTransport::messages), so tests can assert exactly what
/// would have gone out.
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    response: bool,
    staged: Delivery,
    messages: Vec<Delivery>,
    initialized: Option<MailerConfig>,
    transcript: Vec<String>,
}

impl StubTransport {
    /// Creates a new transport that always reports the given outcome.
    pub fn new(response: bool) -> StubTransport {
        StubTransport {
            response,
            ..StubTransport::default()
        }
    }

    /// Creates a new transport that always reports a successful delivery.
    pub fn new_positive() -> StubTransport {
        StubTransport::new(true)
    }

    /// Creates a new transport that always reports a rejected delivery.
    pub fn new_negative() -> StubTransport {
        StubTransport::new(false)
    }

    /// The currently staged message.
    pub fn staged(&self) -> &Delivery {
        &self.staged
    }

    /// Snapshots taken at each delivery attempt, oldest first.
    pub fn messages(&self) -> &[Delivery] {
        &self.messages
    }

    /// The snapshot of the most recent delivery attempt.
    pub fn last_message(&self) -> Option<&Delivery> {
        self.messages.last()
    }

    /// The configuration received through `initialize`, if any.
    pub fn initialized(&self) -> Option<&MailerConfig> {
        self.initialized.as_ref()
    }
}

impl Transport for StubTransport {
    fn initialize(&mut self, config: &MailerConfig) {
        self.transcript.push(format!(
            "initialized (smtp host: {})",
            config.smtp_host.as_deref().unwrap_or("unset")
        ));
        self.initialized = Some(config.clone());
    }

    fn set_from(&mut self, email: &str, name: &str) {
        self.staged.from = Some((email.to_string(), name.to_string()));
    }

    fn set_to(&mut self, recipients: &[Address]) {
        self.staged.to = recipients.iter().map(ToString::to_string).collect();
    }

    fn set_cc(&mut self, recipients: &[Address]) {
        self.staged.cc = recipients.iter().map(ToString::to_string).collect();
    }

    fn set_bcc(&mut self, recipients: &[Address]) {
        self.staged.bcc = recipients.iter().map(ToString::to_string).collect();
    }

    fn set_subject(&mut self, subject: &str) {
        self.staged.subject = subject.to_string();
    }

    fn set_message(&mut self, message: &str) {
        self.staged.message = message.to_string();
    }

    fn set_alt_message(&mut self, message: &str) {
        self.staged.alt_message = Some(message.to_string());
    }

    fn add_attachment(&mut self, attachment: &Attachment) {
        self.staged.attachments.push(attachment.clone());
    }

    fn clear(&mut self, clear_attachments: bool) {
        self.staged.clear(clear_attachments);
        self.transcript
            .push(format!("cleared (attachments: {clear_attachments})"));
    }

    fn send(&mut self, auto_clear: bool) -> bool {
        self.transcript.push(format!(
            "send: {} recipient(s), {}",
            self.staged.to.len(),
            if self.response { "accepted" } else { "rejected" }
        ));
        self.messages.push(self.staged.clone());
        if auto_clear {
            self.staged.clear(true);
        }
        self.response
    }

    fn transcript(&self) -> String {
        self.transcript.join("\n")
    }
}
