//! ### Delivering messages
//!
//! The mailer composes messages; a transport delivers them. The following
//! transports are available:
//!
//! * The `SmtpTransport` delivers over SMTP through the lettre mail client.
//!   It is the preferred way of sending mail.
//! * The `SendmailTransport` pipes the message through a local sendmail
//!   binary, also through lettre.
//! * The `StubTransport` records everything it is given and reports a canned
//!   outcome. It is useful for tests.
//!
//! A transport is a staging area: the mailer pushes the composed fields one
//! by one, then asks for delivery once. Hosts with their own mailing facility
//! implement [`Transport`] over it and inject that instead.

use crate::{address::Address, attachment::Attachment, config::MailerConfig};

#[cfg(feature = "sendmail-transport")]
#[cfg_attr(docsrs, doc(cfg(feature = "sendmail-transport")))]
pub mod sendmail;
#[cfg(feature = "smtp-transport")]
#[cfg_attr(docsrs, doc(cfg(feature = "smtp-transport")))]
pub mod smtp;
pub mod stub;

#[cfg(any(feature = "smtp-transport", feature = "sendmail-transport"))]
mod staging;

/// Staging and delivery operations of a mail transport.
///
/// Mirrors the surface of the delivery facility the mailer was designed
/// against: every setter stages a field, [`send`](Transport::send) performs
/// one delivery attempt and reports the outcome as a boolean. A `false`
/// outcome means the attempt was made and rejected; it is data for the
/// caller, not an error.
pub trait Transport {
    /// Applies a configuration to the transport.
    fn initialize(&mut self, config: &MailerConfig);

    /// Stages the sender address and display name.
    fn set_from(&mut self, email: &str, name: &str);

    /// Stages the destination addresses.
    fn set_to(&mut self, recipients: &[Address]);

    /// Stages the carbon-copy addresses.
    fn set_cc(&mut self, recipients: &[Address]);

    /// Stages the blind-carbon-copy addresses.
    fn set_bcc(&mut self, recipients: &[Address]);

    /// Stages the subject line.
    fn set_subject(&mut self, subject: &str);

    /// Stages the message body.
    fn set_message(&mut self, message: &str);

    /// Stages the alternative message body.
    fn set_alt_message(&mut self, message: &str);

    /// Stages an attachment.
    fn add_attachment(&mut self, attachment: &Attachment);

    /// Clears the staged message, including attachments when
    /// `clear_attachments` is set.
    fn clear(&mut self, clear_attachments: bool);

    /// Performs one delivery attempt with the staged message, clearing the
    /// staged state afterwards when `auto_clear` is set.
    fn send(&mut self, auto_clear: bool) -> bool;

    /// Returns the diagnostic transcript of the transport's activity.
    fn transcript(&self) -> String;
}
