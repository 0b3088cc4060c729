//! Shared staging area for the lettre-backed transports
//!
//! Holds the fields pushed by the mailer and assembles them into a
//! `lettre::Message` at delivery time. Attachment contents are read from disk
//! here; the mailer itself only ever stages metadata.

use std::{fs, path::Path};

use lettre::message::{
    header::ContentType, Attachment as MessageAttachment, Mailbox, Message, MultiPart, SinglePart,
};

use crate::{
    address::Address,
    attachment::{Attachment, Disposition},
};

/// Message fields staged for the next delivery attempt.
#[derive(Debug, Clone, Default)]
pub(crate) struct Staging {
    from: Option<(String, String)>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: String,
    message: String,
    alt_message: Option<String>,
    attachments: Vec<Attachment>,
}

impl Staging {
    pub(crate) fn set_from(&mut self, email: &str, name: &str) {
        self.from = Some((email.to_string(), name.to_string()));
    }

    pub(crate) fn set_to(&mut self, recipients: &[Address]) {
        self.to = recipients.iter().map(ToString::to_string).collect();
    }

    pub(crate) fn set_cc(&mut self, recipients: &[Address]) {
        self.cc = recipients.iter().map(ToString::to_string).collect();
    }

    pub(crate) fn set_bcc(&mut self, recipients: &[Address]) {
        self.bcc = recipients.iter().map(ToString::to_string).collect();
    }

    pub(crate) fn set_subject(&mut self, subject: &str) {
        self.subject = subject.to_string();
    }

    pub(crate) fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub(crate) fn set_alt_message(&mut self, message: &str) {
        self.alt_message = Some(message.to_string());
    }

    pub(crate) fn add_attachment(&mut self, attachment: &Attachment) {
        self.attachments.push(attachment.clone());
    }

    pub(crate) fn clear(&mut self, clear_attachments: bool) {
        let attachments = std::mem::take(&mut self.attachments);
        *self = Staging::default();
        if !clear_attachments {
            self.attachments = attachments;
        }
    }

    pub(crate) fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// Assembles the staged fields into a sendable message.
    ///
    /// The staged body goes out as `text/plain`; a staged alternative body
    /// becomes the `text/html` part of a `multipart/alternative`. Attachments
    /// wrap everything in `multipart/mixed`.
    pub(crate) fn build_message(&self) -> Result<Message, String> {
        let mut builder = Message::builder();

        if let Some((email, name)) = &self.from {
            builder = builder.from(mailbox(email, Some(name))?);
        }
        for to in &self.to {
            builder = builder.to(mailbox(to, None)?);
        }
        for cc in &self.cc {
            builder = builder.cc(mailbox(cc, None)?);
        }
        for bcc in &self.bcc {
            builder = builder.bcc(mailbox(bcc, None)?);
        }
        builder = builder.subject(self.subject.clone());

        let result = if self.attachments.is_empty() {
            match &self.alt_message {
                None => builder.singlepart(self.text_part()),
                Some(alt) => builder.multipart(
                    MultiPart::alternative()
                        .singlepart(self.text_part())
                        .singlepart(html_part(alt)),
                ),
            }
        } else {
            let mut mixed = match &self.alt_message {
                None => MultiPart::mixed().singlepart(self.text_part()),
                Some(alt) => MultiPart::mixed().multipart(
                    MultiPart::alternative()
                        .singlepart(self.text_part())
                        .singlepart(html_part(alt)),
                ),
            };
            for attachment in &self.attachments {
                mixed = mixed.singlepart(attachment_part(attachment)?);
            }
            builder.multipart(mixed)
        };

        result.map_err(|e| format!("could not assemble message: {e}"))
    }

    fn text_part(&self) -> SinglePart {
        SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(self.message.clone())
    }
}

fn html_part(body: &str) -> SinglePart {
    SinglePart::builder()
        .header(ContentType::TEXT_HTML)
        .body(body.to_string())
}

fn mailbox(email: &str, name: Option<&str>) -> Result<Mailbox, String> {
    let address = email
        .parse::<lettre::Address>()
        .map_err(|e| format!("invalid address `{email}`: {e}"))?;
    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from);
    Ok(Mailbox::new(name, address))
}

fn attachment_part(attachment: &Attachment) -> Result<SinglePart, String> {
    let content = fs::read(attachment.filename())
        .map_err(|e| format!("could not read attachment `{}`: {e}", attachment.filename()))?;

    let name = attachment
        .delivered_name()
        .map(String::from)
        .unwrap_or_else(|| basename(attachment.filename()));

    let mime = match attachment.content_type() {
        Some(mime) => mime.clone(),
        None => mime_guess::from_path(attachment.filename()).first_or_octet_stream(),
    };
    let content_type = ContentType::parse(mime.as_ref())
        .map_err(|e| format!("invalid content type `{mime}`: {e}"))?;

    Ok(match attachment.disposition() {
        Disposition::Attachment => MessageAttachment::new(name).body(content, content_type),
        Disposition::Inline => MessageAttachment::new_inline(name).body(content, content_type),
    })
}

fn basename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}
